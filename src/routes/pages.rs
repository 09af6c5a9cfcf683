use axum::{extract::State, response::Html};
use std::sync::Arc;
use tera::Context;

use crate::certificate::Event;
use crate::error::AppError;
use crate::state::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut ctx = Context::new();
    let events: Vec<&str> = Event::ALL.iter().map(|e| e.label()).collect();
    ctx.insert("events", &events);
    render_template(&state, "index.html", &ctx)
}

fn render_template(state: &AppState, name: &str, ctx: &Context) -> Result<Html<String>, AppError> {
    state
        .tera
        .render(name, ctx)
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template {}: {}", name, e)))
}
