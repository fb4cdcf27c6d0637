//! Admin web interface for Vanto CRM.
//!
//! Serves the KPI dashboard and a JSON API over contacts, orders, campaigns,
//! the activity log, spreadsheet import/export and WhatsApp outreach.

mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting admin web server");

    // Connect to database and bring the schema up to date
    let db = Database::connect(&config.database_url).await?;
    let added = db.ensure_schema().await?;
    if !added.is_empty() {
        info!(columns = ?added, "Upgraded existing database");
    }

    // Build application state
    let state = AppState::new(db);

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
