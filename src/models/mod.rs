//! Data models for the AdMarket backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// User model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Blogger,
    Issuer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Blogger => "BLOGGER",
            UserRole::Issuer => "ISSUER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BLOGGER" => Some(UserRole::Blogger),
            "ISSUER" => Some(UserRole::Issuer),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Supported settlement currencies
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Rub,
    Usd,
    Usdt,
}

/// Issuer (advertiser) profile
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct IssuerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub total_deals: i32,
    pub created_at: DateTime<Utc>,
}

/// Blogger (creator) profile
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BloggerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub total_deals: i32,
    pub created_at: DateTime<Utc>,
}

/// Deal model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Deal {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub blogger_id: Uuid,
    pub campaign_application_id: Option<Uuid>,
    pub title: String,
    pub brief: Option<String>,
    pub tz: Option<String>,
    pub social_platform: Option<String>,
    pub format_name: Option<String>,
    pub amount: i64,
    pub currency: Currency,
    // Fixed at creation; later rate changes never touch existing deals
    pub platform_commission: i64,
    pub blogger_amount: i64,
    pub status: DealStatus,
    pub content_url: Option<String>,
    pub content_submitted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deal lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "deal_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStatus {
    Created,
    EscrowFunded,
    ContentSubmitted,
    Completed,
    Disputed,
    Refunded,
    Cancelled,
}

impl DealStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DealStatus::Completed | DealStatus::Refunded | DealStatus::Cancelled
        )
    }
}

/// Ledger transaction model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub user_id: Uuid,
    pub tx_type: TransactionType,
    pub amount: i64,
    pub currency: Currency,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Ledger transaction types
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    EscrowDeposit,
    BloggerPayout,
    Refund,
    PlatformFee,
}

/// Ledger transaction status. Entries are written settled; no
/// pending/partial states are modeled.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "transaction_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Completed,
}

/// Dispute model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Dispute {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub opened_by: DisputeSide,
    pub reason: String,
    pub description: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Dispute status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "dispute_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    Open,
    UnderReview,
    Resolved,
}

/// Which side of the deal opened the dispute
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "dispute_side", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DisputeSide {
    Issuer,
    Blogger,
}

/// Campaign model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub title: String,
    pub brief: Option<String>,
    pub currency: Currency,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

/// Campaign status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "campaign_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CampaignStatus {
    Active,
    Cancelled,
}

/// Campaign application model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct CampaignApplication {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub blogger_id: Uuid,
    pub pitch: Option<String>,
    pub proposed_price: i64,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Campaign application status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "application_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Commission-rate setting; `blogger_id` NULL means the global rate
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct CommissionSetting {
    pub id: Uuid,
    pub blogger_id: Option<Uuid>,
    pub rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Blogger, UserRole::Issuer, UserRole::Admin] {
            let parsed = UserRole::parse(role.as_str());
            assert_eq!(parsed, Some(role));
        }
        assert_eq!(UserRole::parse("MODERATOR"), None);
    }

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&Currency::Rub).unwrap(), "\"RUB\"");
        assert_eq!(serde_json::to_string(&Currency::Usdt).unwrap(), "\"USDT\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
    }

    #[test]
    fn test_deal_status_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&DealStatus::EscrowFunded).unwrap(),
            "\"ESCROW_FUNDED\""
        );
        assert_eq!(
            serde_json::to_string(&DealStatus::ContentSubmitted).unwrap(),
            "\"CONTENT_SUBMITTED\""
        );
        let parsed: DealStatus = serde_json::from_str("\"REFUNDED\"").unwrap();
        assert_eq!(parsed, DealStatus::Refunded);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(DealStatus::Completed.is_terminal());
        assert!(DealStatus::Refunded.is_terminal());
        assert!(DealStatus::Cancelled.is_terminal());
        assert!(!DealStatus::Created.is_terminal());
        assert!(!DealStatus::EscrowFunded.is_terminal());
        assert!(!DealStatus::ContentSubmitted.is_terminal());
        assert!(!DealStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_transaction_type_serde() {
        assert_eq!(
            serde_json::to_string(&TransactionType::EscrowDeposit).unwrap(),
            "\"ESCROW_DEPOSIT\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionType::BloggerPayout).unwrap(),
            "\"BLOGGER_PAYOUT\""
        );
    }
}
