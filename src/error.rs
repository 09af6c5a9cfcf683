use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::certificate::RenderError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid Moodle ID provided")]
    InvalidIdentifier,

    #[error("Invalid student name on record")]
    InvalidName,

    #[error("Moodle ID not found or no event associated. Please check your ID and try again.")]
    NotFound,

    #[error("Error generating certificate. Please try again.")]
    Render(#[from] RenderError),

    #[error("Error downloading certificate. Please try again.")]
    Download(#[source] std::io::Error),

    #[error("Something went wrong. Please try again.")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidIdentifier | AppError::InvalidName => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Render(e) => {
                tracing::error!("Certificate generation failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Download(e) => {
                tracing::error!("Error sending file: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
