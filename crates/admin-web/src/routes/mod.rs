//! Route handlers for the admin web interface.

pub mod activities;
pub mod campaigns;
pub mod contacts;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod outreach;
pub mod transfer;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        // Health check
        .route("/health", get(health::health))
        // Dashboard data
        .route("/api/kpis", get(dashboard::kpis_api))
        .route("/api/levels", get(dashboard::levels_api))
        // Contacts
        .route(
            "/api/contacts",
            get(contacts::list_api).post(contacts::create_api),
        )
        .route("/api/contacts/search", post(contacts::search_api))
        .route(
            "/api/contacts/:id",
            get(contacts::get_api)
                .patch(contacts::update_api)
                .delete(contacts::delete_api),
        )
        // Import / export
        .route("/api/import", post(transfer::import_api))
        .route("/api/export.csv", get(transfer::export_api))
        // Orders, campaigns and activity log
        .route("/api/orders", get(orders::list_api).post(orders::create_api))
        .route(
            "/api/campaigns",
            get(campaigns::list_api).post(campaigns::create_api),
        )
        .route(
            "/api/activities",
            get(activities::list_api).post(activities::create_api),
        )
        // WhatsApp
        .route("/api/outreach/preview", post(outreach::preview_api))
        .route("/api/outreach/log", post(outreach::log_api))
}
