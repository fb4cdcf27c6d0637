//! Database models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::field::ContactField;
use crate::status::{CampaignOutcome, OrderStatus};

/// A contact: a sales lead or a network distributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name
    pub name: String,
    /// Phone number, unique when present
    pub phone: String,
    pub email: String,
    /// Where the lead came from (e.g., "Referral")
    pub source: String,
    /// Products of interest
    pub interest: String,
    /// Lead temperature (e.g., "New", "Warm", "Hot")
    pub lead_status: String,
    pub communication_status: String,
    pub registration_status: String,
    /// Comma-joined tags
    pub tags: String,
    /// Owning rep
    pub assigned: String,
    pub notes: String,
    pub action_needed: String,
    pub action_taken: String,
    pub username: String,
    /// Stored as entered.
    #[serde(skip_serializing)]
    pub password: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub location: String,
    /// Distributor level, 1 to 13
    pub level: Option<i64>,
    /// Branch label in the downline
    pub leg: String,
    pub associate_id: String,
    /// "Active" or "Expired"
    pub member_status: String,
    /// "Distributor" or "Inactive"
    pub distributor_status: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl Contact {
    /// Stored text for a field; the level is rendered in decimal.
    pub fn text(&self, field: ContactField) -> String {
        let value = match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Source => &self.source,
            ContactField::Interest => &self.interest,
            ContactField::LeadStatus => &self.lead_status,
            ContactField::CommunicationStatus => &self.communication_status,
            ContactField::RegistrationStatus => &self.registration_status,
            ContactField::Tags => &self.tags,
            ContactField::Assigned => &self.assigned,
            ContactField::Notes => &self.notes,
            ContactField::ActionNeeded => &self.action_needed,
            ContactField::ActionTaken => &self.action_taken,
            ContactField::Username => &self.username,
            ContactField::Password => &self.password,
            ContactField::Country => &self.country,
            ContactField::Province => &self.province,
            ContactField::City => &self.city,
            ContactField::Location => &self.location,
            ContactField::Leg => &self.leg,
            ContactField::AssociateId => &self.associate_id,
            ContactField::MemberStatus => &self.member_status,
            ContactField::DistributorStatus => &self.distributor_status,
            ContactField::Level => {
                return self.level.map(|level| level.to_string()).unwrap_or_default();
            }
        };
        value.clone()
    }
}

/// An order placed by a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning contact; cleared when the contact is deleted.
    pub contact_id: Option<i64>,
    /// Owning contact's name, empty when the contact is gone.
    pub contact_name: String,
    pub order_date: String,
    pub product: String,
    pub qty: i64,
    pub amount: f64,
    pub notes: String,
    /// Reference to a proof-of-payment document.
    pub proof_of_payment: String,
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Input for a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewOrder {
    pub contact_id: Option<i64>,
    pub order_date: String,
    pub product: String,
    pub qty: i64,
    pub amount: f64,
    pub notes: String,
    pub proof_of_payment: String,
    pub status: OrderStatus,
}

impl Default for NewOrder {
    fn default() -> Self {
        Self {
            contact_id: None,
            order_date: String::new(),
            product: String::new(),
            qty: 1,
            amount: 0.0,
            notes: String::new(),
            proof_of_payment: String::new(),
            status: OrderStatus::default(),
        }
    }
}

/// An outbound interaction with a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    /// Auto-incrementing ID.
    pub id: i64,
    pub contact_id: Option<i64>,
    /// Channel label (e.g., "whatsapp")
    pub channel: String,
    /// Message content or summary.
    pub message: String,
    /// When the interaction was logged.
    pub ts: String,
}

/// A marketing campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Campaign {
    /// Auto-incrementing ID.
    pub id: i64,
    pub channel: String,
    pub name: String,
    /// Target audience or segment.
    pub audience: String,
    /// Message template text.
    pub message: String,
    pub outcome: String,
    pub notes: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Input for a new campaign.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCampaign {
    pub channel: String,
    pub name: String,
    pub audience: String,
    pub message: String,
    pub outcome: CampaignOutcome,
    pub notes: String,
}

/// Dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, FromRow)]
pub struct Kpis {
    pub total_contacts: i64,
    /// Contacts with member status "Active".
    pub active: i64,
    /// Contacts with member status "Expired".
    pub expired: i64,
    /// Contacts with distributor status "Distributor".
    pub distributors: i64,
    /// Contacts with distributor status "Inactive".
    pub inactive: i64,
    /// Total orders.
    pub orders: i64,
}

impl Kpis {
    /// Metric name to count.
    pub fn as_map(&self) -> BTreeMap<&'static str, i64> {
        BTreeMap::from([
            ("total_contacts", self.total_contacts),
            ("active", self.active),
            ("expired", self.expired),
            ("distributors", self.distributors),
            ("inactive", self.inactive),
            ("orders", self.orders),
        ])
    }
}

/// Number of distributors at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LevelCount {
    pub level: i64,
    pub count: i64,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows that created a new contact.
    pub inserted: usize,
    /// Rows that overwrote an existing contact.
    pub updated: usize,
    /// Rows where a malformed value was replaced by its default.
    pub recovered: usize,
}

impl ImportSummary {
    /// Rows written, inserted or updated.
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}
