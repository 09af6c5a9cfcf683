mod certificate;
mod config;
mod error;
mod roster;
mod routes;
mod state;
mod storage;
mod templates;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::certificate::CertificateRenderer;
use crate::roster::Roster;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certifier=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    let renderer = CertificateRenderer::from_config(&config);
    renderer.store().ensure_dir()?;
    tracing::info!("Certificates cached in {}", renderer.store().dir().display());

    let roster = Roster::load_or_empty(&config.student_data);
    let tera = templates::load(&config.page_templates)?;

    let state = Arc::new(state::AppState {
        config: config.clone(),
        roster: Arc::new(roster),
        renderer: Arc::new(renderer),
        tera,
    });

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Certifier listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
