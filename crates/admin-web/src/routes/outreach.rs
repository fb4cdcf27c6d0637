//! WhatsApp outreach routes.

use axum::extract::State;
use axum::Json;
use outreach::Message;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// A template to fill for one contact.
#[derive(Debug, Deserialize)]
pub struct OutreachRequest {
    pub contact_id: i64,
    pub template: String,
}

/// A logged message.
#[derive(Serialize)]
pub struct Logged {
    pub activity_id: i64,
    pub message: Message,
}

/// Render the message and link without recording anything.
pub async fn preview_api(
    State(state): State<AppState>,
    Json(req): Json<OutreachRequest>,
) -> Result<Json<Message>> {
    let message = state.outreach.prepare(req.contact_id, &req.template).await?;
    Ok(Json(message))
}

/// Render the message and record it as sent.
pub async fn log_api(
    State(state): State<AppState>,
    Json(req): Json<OutreachRequest>,
) -> Result<Json<Logged>> {
    let message = state.outreach.prepare(req.contact_id, &req.template).await?;
    let activity_id = state.outreach.log_sent(&message).await?;
    Ok(Json(Logged {
        activity_id,
        message,
    }))
}
