//! Dispute types and admin DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::models::{Dispute, DisputeSide, DisputeStatus};
use crate::models::{Currency, DealStatus};

/// Admin resolution outcome. `Refund` also closes the deal as REFUNDED
/// and returns the escrowed amount to the issuer; `Dismiss` closes only
/// the dispute and leaves the deal DISPUTED.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisputeOutcome {
    Refund,
    Dismiss,
}

/// Request DTO for resolving a dispute
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveDisputeRequest {
    pub outcome: DisputeOutcome,
    #[validate(length(min = 1, message = "Resolution text is required"))]
    pub resolution: String,
}

/// Dispute joined with its deal summary, for the admin queue
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DisputeWithDeal {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub dispute: Dispute,
    pub deal_title: String,
    pub deal_amount: i64,
    pub deal_currency: Currency,
    pub deal_status: DealStatus,
    pub issuer_company: Option<String>,
    pub blogger_name: Option<String>,
}
