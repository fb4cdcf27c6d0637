//! Order routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{order, NewOrder, Order};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::routes::contacts::Created;
use crate::state::AppState;

/// Query string for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub contact_id: Option<i64>,
}

/// List orders, newest order date first.
pub async fn list_api(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Order>>> {
    let pool = state.db.pool();
    let orders = match params.contact_id {
        Some(contact_id) => order::list_orders_for_contact(pool, contact_id).await?,
        None => order::list_orders(pool).await?,
    };
    Ok(Json(orders))
}

/// Record an order.
pub async fn create_api(
    State(state): State<AppState>,
    Json(new_order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Created>)> {
    let id = order::insert_order(state.db.pool(), &new_order).await?;
    info!(id, contact_id = ?new_order.contact_id, "Order recorded");
    Ok((StatusCode::CREATED, Json(Created { id })))
}
