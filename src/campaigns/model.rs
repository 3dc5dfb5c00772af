//! Campaign types and request DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::models::{ApplicationStatus, Campaign, CampaignApplication, CampaignStatus};
use crate::models::{Currency, Deal};

/// Request DTO for creating a campaign
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub brief: Option<String>,
    pub currency: Currency,
}

/// Request DTO for applying to a campaign
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyCampaignRequest {
    pub pitch: Option<String>,
    #[validate(range(min = 1, message = "Proposed price must be greater than 0"))]
    pub proposed_price: i64,
}

/// Issuer decision on a pending application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationDecision {
    Accepted,
    Rejected,
}

/// Request DTO for deciding an application
#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: ApplicationDecision,
}

/// Result of an application decision: acceptance yields the spawned
/// deal, rejection the updated application
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApplicationOutcome {
    Deal(Deal),
    Application(CampaignApplication),
}

/// Application row with the applicant's public info, for the intake
/// listing
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ApplicationWithBlogger {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: CampaignApplication,
    pub blogger_name: Option<String>,
    pub blogger_total_deals: i32,
}
