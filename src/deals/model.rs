//! Deal types and request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub use crate::models::{Deal, DealStatus};
use crate::models::Currency;

/// Request DTO for creating a direct-offer deal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDealRequest {
    pub blogger_id: Uuid,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub brief: Option<String>,
    pub tz: Option<String>,
    pub social_platform: Option<String>,
    pub format_name: Option<String>,
    #[validate(range(min = 1, message = "Amount must be greater than 0"))]
    pub amount: i64,
    pub currency: Currency,
}

/// Request DTO for submitting deal content
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitContentRequest {
    #[validate(url(message = "content_url must be a valid URL"))]
    pub content_url: String,
}

/// Request DTO for opening a dispute
#[derive(Debug, Deserialize, Validate)]
pub struct OpenDisputeRequest {
    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Deal row joined with both parties' user ids, for authorization
/// checks against the caller
#[derive(Debug, sqlx::FromRow)]
pub struct DealWithParties {
    #[sqlx(flatten)]
    pub deal: Deal,
    pub issuer_user_id: Uuid,
    pub blogger_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_deal_request_rejects_zero_amount() {
        let request = CreateDealRequest {
            blogger_id: Uuid::new_v4(),
            title: "Launch teaser".to_string(),
            brief: None,
            tz: None,
            social_platform: None,
            format_name: None,
            amount: 0,
            currency: Currency::Rub,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_content_request_requires_url() {
        let bad = SubmitContentRequest {
            content_url: "not a url".to_string(),
        };
        assert!(bad.validate().is_err());

        let good = SubmitContentRequest {
            content_url: "https://example.com/post/123".to_string(),
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_open_dispute_request_requires_both_fields() {
        let missing = OpenDisputeRequest {
            reason: String::new(),
            description: "Content never delivered".to_string(),
        };
        assert!(missing.validate().is_err());
    }
}
