//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Health check endpoint. Reports 503 when the database cannot be queried.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    if database::contact::count_contacts(state.db.pool()).await.is_ok() {
        (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "storage unavailable".to_string(),
            }),
        )
    }
}
