use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::AppError;
use crate::roster::{validate_identifier, validate_name};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    moodle_id: String,
}

pub async fn download_certificate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DownloadForm>,
) -> Result<Response, AppError> {
    let moodle_id = form.moodle_id.trim();
    if moodle_id.is_empty() || !validate_identifier(moodle_id) {
        return Err(AppError::InvalidIdentifier);
    }

    let record = state.roster.resolve(moodle_id).ok_or(AppError::NotFound)?;
    let Some(event) = record.event.clone() else {
        debug!("Moodle ID {} has no event", moodle_id);
        return Err(AppError::NotFound);
    };
    if !validate_name(&record.name) {
        return Err(AppError::InvalidName);
    }

    let name = record.name.clone();
    let renderer = state.renderer.clone();
    let cert_path = tokio::task::spawn_blocking(move || renderer.render(&name, Some(&event)))
        .await
        .map_err(|e| AppError::Internal(format!("render task failed: {}", e)))??;

    let content = tokio::fs::read(&cert_path).await.map_err(AppError::Download)?;

    let filename = cert_path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("certificate.png");
    let mime = mime_guess::from_path(&cert_path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    )
        .into_response())
}
