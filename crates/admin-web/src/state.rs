//! Application state shared across handlers.

use database::Database;
use outreach::Outreach;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// WhatsApp message preparation.
    pub outreach: Outreach,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database) -> Self {
        let outreach = Outreach::new(db.clone());
        Self { db, outreach }
    }
}
