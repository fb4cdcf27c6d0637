//! Contact routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{contact, Contact, ContactFilter, FieldMap};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AdminError, Result};
use crate::state::AppState;

/// Query string for the contact list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Free-text search over name, phone, email and associate ID.
    pub q: Option<String>,
}

/// ID of a newly created record.
#[derive(Serialize)]
pub struct Created {
    pub id: i64,
}

/// Result of a partial update.
#[derive(Serialize)]
pub struct Updated {
    pub updated: bool,
}

/// List contacts, optionally narrowed by `?q=`.
pub async fn list_api(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>> {
    let filter = match params.q {
        Some(q) => ContactFilter::default().search(q),
        None => ContactFilter::default(),
    };
    let contacts = contact::list_contacts(state.db.pool(), &filter).await?;
    Ok(Json(contacts))
}

/// List contacts matching a full filter.
pub async fn search_api(
    State(state): State<AppState>,
    Json(filter): Json<ContactFilter>,
) -> Result<Json<Vec<Contact>>> {
    let contacts = contact::list_contacts(state.db.pool(), &filter).await?;
    Ok(Json(contacts))
}

/// Create a contact. A name or a phone number is required.
pub async fn create_api(
    State(state): State<AppState>,
    Json(fields): Json<FieldMap>,
) -> Result<(StatusCode, Json<Created>)> {
    if !fields.is_identifiable() {
        return Err(AdminError::BadRequest(
            "a contact needs a name or a phone number".to_string(),
        ));
    }
    let id = contact::create_contact(state.db.pool(), &fields).await?;
    info!(id, "Contact created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// Get one contact.
pub async fn get_api(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Contact>> {
    let contact = contact::get_contact(state.db.pool(), id).await?;
    Ok(Json(contact))
}

/// Overwrite the given fields of a contact.
///
/// An empty body or an unknown ID changes nothing and reports
/// `{"updated": false}`.
pub async fn update_api(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<FieldMap>,
) -> Result<Json<Updated>> {
    let updated = contact::update_contact(state.db.pool(), id, &fields).await?;
    Ok(Json(Updated { updated }))
}

/// Delete a contact with its activities. Deleting an unknown ID is a no-op.
pub async fn delete_api(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if contact::delete_contact(state.db.pool(), id).await? {
        info!(id, "Contact deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
