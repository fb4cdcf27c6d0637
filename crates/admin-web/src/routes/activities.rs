//! Activity log routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{activity, contact, Activity};
use serde::Deserialize;

use crate::error::Result;
use crate::routes::contacts::Created;
use crate::state::AppState;

/// Query string for the activity list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub contact_id: Option<i64>,
}

/// Request to log an interaction.
#[derive(Debug, Deserialize)]
pub struct NewActivity {
    pub contact_id: i64,
    pub channel: String,
    #[serde(default)]
    pub message: String,
}

/// List activities, newest first.
pub async fn list_api(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Activity>>> {
    let activities = activity::list_activities(state.db.pool(), params.contact_id).await?;
    Ok(Json(activities))
}

/// Log an interaction with an existing contact.
pub async fn create_api(
    State(state): State<AppState>,
    Json(req): Json<NewActivity>,
) -> Result<(StatusCode, Json<Created>)> {
    let pool = state.db.pool();
    contact::get_contact(pool, req.contact_id).await?;
    let id = activity::insert_activity(pool, req.contact_id, &req.channel, &req.message).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}
