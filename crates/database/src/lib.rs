//! SQLite persistence layer for Vanto CRM.
//!
//! This crate stores contacts (leads and network distributors), their orders,
//! outbound activity and marketing campaigns using SQLx with SQLite. It also
//! reconciles spreadsheet imports against existing contacts and computes the
//! dashboard counts.
//!
//! # Example
//!
//! ```no_run
//! use database::{contact, ContactField, ContactFilter, Database, FieldMap};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and make sure every table and column exists
//!     let db = Database::connect("sqlite:crm.sqlite3?mode=rwc").await?;
//!     db.ensure_schema().await?;
//!
//!     // Create a contact
//!     let fields = FieldMap::new()
//!         .with(ContactField::Name, "Jane Doe")
//!         .with(ContactField::Phone, "0821234567")
//!         .with(ContactField::Level, 3i64);
//!     let id = contact::create_contact(db.pool(), &fields).await?;
//!
//!     let level_three = ContactFilter::default().levels([3]);
//!     let found = contact::list_contacts(db.pool(), &level_three).await?;
//!     assert!(found.iter().any(|c| c.id == id));
//!
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod campaign;
pub mod contact;
pub mod error;
pub mod export;
pub mod field;
pub mod import;
pub mod kpi;
pub mod location;
pub mod models;
pub mod normalize;
pub mod order;
pub mod schema;
pub mod status;
pub mod validation;

pub use contact::ContactFilter;
pub use error::{DatabaseError, Result};
pub use field::ContactField;
pub use import::ImportRecord;
pub use models::{
    Activity, Campaign, Contact, ImportSummary, Kpis, LevelCount, NewCampaign, NewOrder, Order,
};
pub use normalize::{normalize, FieldMap, FieldValue, Scalar};
pub use status::{CampaignOutcome, DistributorStatus, MemberStatus, OrderStatus};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size. One operator drives the store, so a few
    /// connections are plenty.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/crm.sqlite3?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// Fails with [`DatabaseError::StorageUnavailable`] when the file cannot
    /// be opened or created.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let unavailable = |source: sqlx::Error| DatabaseError::StorageUnavailable {
            location: url.to_string(),
            source,
        };

        let options = SqliteConnectOptions::from_str(url)
            .map_err(unavailable)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Create missing tables and add missing columns.
    ///
    /// Call once after connecting. Safe to call again at any time; returns
    /// the `table.column` names it had to add.
    pub async fn ensure_schema(&self) -> Result<Vec<String>> {
        tracing::info!("Ensuring database schema...");

        let added = schema::ensure(&self.pool).await?;

        tracing::info!(added = added.len(), "Schema ready");
        Ok(added)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
