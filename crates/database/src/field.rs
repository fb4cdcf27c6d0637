//! Recognized contact columns.

use serde::{Deserialize, Serialize};

/// A recognized contact field.
///
/// The contact table is the superset of the lead-pipeline and the
/// distributor-network column sets. Every field except `level` is stored as
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Source,
    Interest,
    LeadStatus,
    CommunicationStatus,
    RegistrationStatus,
    Tags,
    Assigned,
    Notes,
    ActionNeeded,
    ActionTaken,
    Username,
    Password,
    Country,
    Province,
    City,
    Location,
    Level,
    Leg,
    AssociateId,
    MemberStatus,
    DistributorStatus,
}

impl ContactField {
    /// Every recognized field, in export column order.
    pub const ALL: [ContactField; 24] = [
        ContactField::Level,
        ContactField::Leg,
        ContactField::AssociateId,
        ContactField::Name,
        ContactField::MemberStatus,
        ContactField::Location,
        ContactField::Phone,
        ContactField::Email,
        ContactField::Tags,
        ContactField::DistributorStatus,
        ContactField::Source,
        ContactField::Interest,
        ContactField::LeadStatus,
        ContactField::CommunicationStatus,
        ContactField::RegistrationStatus,
        ContactField::Assigned,
        ContactField::Notes,
        ContactField::ActionNeeded,
        ContactField::ActionTaken,
        ContactField::Username,
        ContactField::Password,
        ContactField::Country,
        ContactField::Province,
        ContactField::City,
    ];

    /// Get the database column name for this field.
    pub fn column_name(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Source => "source",
            ContactField::Interest => "interest",
            ContactField::LeadStatus => "lead_status",
            ContactField::CommunicationStatus => "communication_status",
            ContactField::RegistrationStatus => "registration_status",
            ContactField::Tags => "tags",
            ContactField::Assigned => "assigned",
            ContactField::Notes => "notes",
            ContactField::ActionNeeded => "action_needed",
            ContactField::ActionTaken => "action_taken",
            ContactField::Username => "username",
            ContactField::Password => "password",
            ContactField::Country => "country",
            ContactField::Province => "province",
            ContactField::City => "city",
            ContactField::Location => "location",
            ContactField::Level => "level",
            ContactField::Leg => "leg",
            ContactField::AssociateId => "associate_id",
            ContactField::MemberStatus => "member_status",
            ContactField::DistributorStatus => "distributor_status",
        }
    }

    /// Parse a field name from caller input.
    ///
    /// Accepts canonical column names and a few aliases used by older forms.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        let field = match normalized.as_str() {
            "name" => ContactField::Name,
            "phone" => ContactField::Phone,
            "email" | "e-mail" => ContactField::Email,
            "source" => ContactField::Source,
            "interest" => ContactField::Interest,
            "lead_status" | "status" => ContactField::LeadStatus,
            "communication_status" => ContactField::CommunicationStatus,
            "registration_status" => ContactField::RegistrationStatus,
            "tags" => ContactField::Tags,
            "assigned" | "assigned_to" => ContactField::Assigned,
            "notes" => ContactField::Notes,
            "action_needed" => ContactField::ActionNeeded,
            "action_taken" => ContactField::ActionTaken,
            "username" => ContactField::Username,
            "password" => ContactField::Password,
            "country" => ContactField::Country,
            "province" => ContactField::Province,
            "city" => ContactField::City,
            "location" => ContactField::Location,
            "level" => ContactField::Level,
            "leg" => ContactField::Leg,
            "associate_id" => ContactField::AssociateId,
            "member_status" => ContactField::MemberStatus,
            "distributor_status" => ContactField::DistributorStatus,
            _ => return None,
        };
        Some(field)
    }

    /// Spreadsheet header used by the distributor import layout, if any.
    pub fn header(&self) -> Option<&'static str> {
        match self {
            ContactField::Level => Some("Level"),
            ContactField::Leg => Some("Leg"),
            ContactField::AssociateId => Some("Associate's ID"),
            ContactField::Name => Some("Name and surname"),
            ContactField::MemberStatus => Some("GO status"),
            ContactField::Location => Some("Location"),
            ContactField::Phone => Some("Phone"),
            ContactField::Email => Some("E-mail"),
            ContactField::Tags => Some("Tags (comma-separated)"),
            _ => None,
        }
    }

    /// Map a spreadsheet header onto a field.
    ///
    /// Layout headers match exactly after trimming; canonical column names are
    /// accepted as a fallback so exported files re-import cleanly.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.header() == Some(header))
            .or_else(|| Self::from_str(header))
    }

    /// Header written for this field on export.
    pub fn export_header(&self) -> &'static str {
        self.header().unwrap_or_else(|| self.column_name())
    }

    /// Whether the column holds an integer instead of text.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ContactField::Level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_column_names() {
        for field in ContactField::ALL {
            assert_eq!(ContactField::from_str(field.column_name()), Some(field));
        }
        assert_eq!(ContactField::from_str("E-Mail"), Some(ContactField::Email));
        assert_eq!(ContactField::from_str("status"), Some(ContactField::LeadStatus));
        assert_eq!(ContactField::from_str("favourite_colour"), None);
    }

    #[test]
    fn test_from_header() {
        assert_eq!(
            ContactField::from_header(" Associate's ID "),
            Some(ContactField::AssociateId)
        );
        assert_eq!(
            ContactField::from_header("Name and surname"),
            Some(ContactField::Name)
        );
        assert_eq!(
            ContactField::from_header("GO status"),
            Some(ContactField::MemberStatus)
        );
        assert_eq!(ContactField::from_header("city"), Some(ContactField::City));
        assert_eq!(ContactField::from_header("Sponsor"), None);
    }

    #[test]
    fn test_export_headers_are_unique() {
        let mut headers: Vec<_> = ContactField::ALL.iter().map(|f| f.export_header()).collect();
        headers.sort();
        headers.dedup();
        assert_eq!(headers.len(), ContactField::ALL.len());
    }
}
