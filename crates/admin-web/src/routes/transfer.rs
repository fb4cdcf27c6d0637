//! Spreadsheet import and CSV export.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Json;
use database::{export, import, ImportRecord, ImportSummary};

use crate::error::{AdminError, Result};
use crate::state::AppState;

/// Import contacts.
///
/// Accepts CSV with a header row, or a JSON array of header-to-cell objects
/// when the content type is `application/json`.
pub async fn import_api(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImportSummary>> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let records: Vec<ImportRecord> = if is_json {
        serde_json::from_slice(&body).map_err(|err| AdminError::BadRequest(err.to_string()))?
    } else {
        import::read_csv(&body[..])?
    };

    let summary = import::import_batch(state.db.pool(), &records).await?;
    Ok(Json(summary))
}

/// Download every contact as CSV.
pub async fn export_api(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut csv = Vec::new();
    export::export_csv(state.db.pool(), &mut csv).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"contacts.csv\"",
            ),
        ],
        csv,
    ))
}
