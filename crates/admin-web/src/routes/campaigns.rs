//! Campaign routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{campaign, Campaign, NewCampaign};
use serde::Deserialize;

use crate::error::Result;
use crate::routes::contacts::Created;
use crate::state::AppState;

/// Query string for the campaign list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

/// List campaigns, newest first.
pub async fn list_api(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Campaign>>> {
    let campaigns = campaign::list_campaigns(state.db.pool(), params.q.as_deref()).await?;
    Ok(Json(campaigns))
}

/// Record a campaign.
pub async fn create_api(
    State(state): State<AppState>,
    Json(new_campaign): Json<NewCampaign>,
) -> Result<(StatusCode, Json<Created>)> {
    let id = campaign::insert_campaign(state.db.pool(), &new_campaign).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}
