//! Closed value sets stored as text.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Membership standing of a distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemberStatus {
    #[default]
    Active,
    Expired,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Expired => "Expired",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(MemberStatus::Active),
            "expired" => Some(MemberStatus::Expired),
            _ => None,
        }
    }
}

/// Whether a contact is a working distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistributorStatus {
    #[default]
    Distributor,
    Inactive,
}

impl DistributorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributorStatus::Distributor => "Distributor",
            DistributorStatus::Inactive => "Inactive",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "distributor" => Some(DistributorStatus::Distributor),
            "inactive" => Some(DistributorStatus::Inactive),
            _ => None,
        }
    }
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(ValidationError::UnknownVariant {
                field: "order status".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Recorded result of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CampaignOutcome {
    /// No outcome recorded yet.
    #[default]
    #[serde(rename = "")]
    Unrecorded,
    Sent,
    Replied,
    Converted,
    Bounced,
    Seen,
}

impl CampaignOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignOutcome::Unrecorded => "",
            CampaignOutcome::Sent => "Sent",
            CampaignOutcome::Replied => "Replied",
            CampaignOutcome::Converted => "Converted",
            CampaignOutcome::Bounced => "Bounced",
            CampaignOutcome::Seen => "Seen",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(CampaignOutcome::Unrecorded),
            "sent" => Ok(CampaignOutcome::Sent),
            "replied" => Ok(CampaignOutcome::Replied),
            "converted" => Ok(CampaignOutcome::Converted),
            "bounced" => Ok(CampaignOutcome::Bounced),
            "seen" => Ok(CampaignOutcome::Seen),
            _ => Err(ValidationError::UnknownVariant {
                field: "campaign outcome".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_status_parse() {
        assert_eq!(MemberStatus::parse("ACTIVE"), Some(MemberStatus::Active));
        assert_eq!(MemberStatus::parse(" expired "), Some(MemberStatus::Expired));
        assert_eq!(MemberStatus::parse("lapsed"), None);
    }

    #[test]
    fn test_distributor_status_parse() {
        assert_eq!(
            DistributorStatus::parse("distributor"),
            Some(DistributorStatus::Distributor)
        );
        assert_eq!(
            DistributorStatus::parse("Inactive"),
            Some(DistributorStatus::Inactive)
        );
        assert_eq!(DistributorStatus::parse(""), None);
    }

    #[test]
    fn test_order_status_parse() {
        assert_eq!(OrderStatus::parse("shipped"), Ok(OrderStatus::Shipped));
        assert!(OrderStatus::parse("lost").is_err());
    }

    #[test]
    fn test_campaign_outcome_serde() {
        assert_eq!(CampaignOutcome::parse(""), Ok(CampaignOutcome::Unrecorded));
        assert_eq!(
            serde_json::to_string(&CampaignOutcome::Unrecorded).unwrap(),
            r#""""#
        );
        let outcome: CampaignOutcome = serde_json::from_str(r#""Replied""#).unwrap();
        assert_eq!(outcome, CampaignOutcome::Replied);
    }
}
