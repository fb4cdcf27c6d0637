//! Error types for the admin web interface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur in the admin web interface.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Template or outreach error.
    #[error("Outreach error: {0}")]
    Outreach(#[from] outreach::Error),

    /// Request body could not be understood.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AdminError {
    fn status(&self) -> StatusCode {
        match self {
            AdminError::Database(err) | AdminError::Outreach(outreach::Error::Database(err)) => {
                database_status(err)
            }
            AdminError::Outreach(_) | AdminError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn database_status(err: &DatabaseError) -> StatusCode {
    match err {
        DatabaseError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
        DatabaseError::AlreadyExists { .. } => StatusCode::CONFLICT,
        DatabaseError::Validation(_) | DatabaseError::Csv(_) => StatusCode::BAD_REQUEST,
        DatabaseError::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
