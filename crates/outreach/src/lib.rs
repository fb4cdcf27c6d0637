//! WhatsApp outreach for Vanto CRM.
//!
//! This crate fills message templates from contact records, builds `wa.me`
//! click-to-chat links and records sent messages in the activity log.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//! use outreach::Outreach;
//!
//! # async fn example() -> Result<(), outreach::Error> {
//! let db = Database::connect("sqlite:crm.sqlite3?mode=rwc").await?;
//! let outreach = Outreach::new(db);
//!
//! // Fill the template and build the link
//! let message = outreach.prepare(1, "Hi {name}, your level is {level}").await?;
//! println!("{}", message.link);
//!
//! // Record it once the operator has sent it
//! outreach.log_sent(&message).await?;
//! # Ok(())
//! # }
//! ```

pub mod link;
pub mod template;

pub use link::{normalize_phone, whatsapp_link};
pub use template::{render_template, ContactContext};

use database::{activity, contact, Database, DatabaseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Activity channel recorded for WhatsApp messages.
pub const CHANNEL: &str = "whatsapp";

/// Errors that can occur while preparing or logging outreach.
#[derive(Debug, Error)]
pub enum Error {
    /// The template names a field the contact does not have.
    #[error("Unknown template field: {{{0}}}")]
    MissingField(String),

    /// The template has unbalanced braces.
    #[error("Malformed template at byte {position}: {reason}")]
    MalformedTemplate {
        position: usize,
        reason: &'static str,
    },

    /// Storage error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// A filled message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub contact_id: i64,
    /// Contact's display name.
    pub name: String,
    /// Rendered message text.
    pub text: String,
    /// `wa.me` link with the text pre-filled.
    pub link: String,
}

/// Prepares WhatsApp messages and logs them as activities.
#[derive(Debug, Clone)]
pub struct Outreach {
    db: Database,
}

impl Outreach {
    /// Create an outreach helper backed by `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Fill `template` for a contact and build its WhatsApp link.
    pub async fn prepare(&self, contact_id: i64, template: &str) -> Result<Message, Error> {
        let contact = contact::get_contact(self.db.pool(), contact_id).await?;
        let text = render_template(template, &contact)?;
        let link = whatsapp_link(&contact.phone, &text);

        Ok(Message {
            contact_id,
            name: contact.name,
            text,
            link,
        })
    }

    /// Record a sent message in the activity log.
    pub async fn log_sent(&self, message: &Message) -> Result<i64, Error> {
        let id =
            activity::insert_activity(self.db.pool(), message.contact_id, CHANNEL, &message.text)
                .await?;
        info!(contact_id = message.contact_id, "Logged WhatsApp message");
        Ok(id)
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{ContactField, FieldMap};

    async fn setup() -> (Outreach, i64) {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.ensure_schema().await.unwrap();
        let id = contact::create_contact(
            db.pool(),
            &FieldMap::new()
                .with(ContactField::Name, "Jane Doe")
                .with(ContactField::Phone, "082 123 4567")
                .with(ContactField::Level, 4i64)
                .with(ContactField::AssociateId, "A-77"),
        )
        .await
        .unwrap();
        (Outreach::new(db), id)
    }

    #[tokio::test]
    async fn test_prepare_and_log() {
        let (outreach, id) = setup().await;

        let message = outreach
            .prepare(id, "Hi {name}, level {level} ({id})")
            .await
            .unwrap();
        assert_eq!(message.text, "Hi Jane Doe, level 4 (A-77)");
        assert_eq!(message.name, "Jane Doe");
        assert!(message.link.starts_with("https://wa.me/27821234567?text=Hi%20Jane"));

        outreach.log_sent(&message).await.unwrap();
        let logged = activity::list_activities(outreach.database().pool(), Some(id))
            .await
            .unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].channel, CHANNEL);
        assert_eq!(logged[0].message, message.text);
    }

    #[tokio::test]
    async fn test_prepare_errors() {
        let (outreach, id) = setup().await;

        assert!(matches!(
            outreach.prepare(id, "Hi {nickname}").await,
            Err(Error::MissingField(_))
        ));
        assert!(matches!(
            outreach.prepare(id + 100, "Hi").await,
            Err(Error::Database(DatabaseError::NotFound { .. }))
        ));
        assert!(activity::list_activities(outreach.database().pool(), None)
            .await
            .unwrap()
            .is_empty());
    }
}
