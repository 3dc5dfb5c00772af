//! Commission types and math

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

pub use crate::models::CommissionSetting;

/// Fallback rate when no commission setting row exists
pub const DEFAULT_COMMISSION_RATE: f64 = 0.10;

/// Platform commission for a deal amount, rounded to the nearest whole
/// unit (half away from zero). Computed once at deal creation.
pub fn platform_commission(amount: i64, rate: f64) -> i64 {
    (amount as f64 * rate).round() as i64
}

/// Request DTO for setting a commission rate
#[derive(Debug, Deserialize, Validate)]
pub struct SetRateRequest {
    #[validate(range(min = 0.0, max = 0.5, message = "Rate must be between 0 and 0.5"))]
    pub rate: f64,
}

/// Admin overview of the commission configuration
#[derive(Debug, Serialize)]
pub struct CommissionOverview {
    pub global_rate: f64,
    pub blogger_rates: Vec<BloggerRate>,
}

/// Per-blogger override row in the overview
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct BloggerRate {
    pub blogger_id: Uuid,
    pub blogger_name: Option<String>,
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_at_default_rate() {
        assert_eq!(platform_commission(100_000, DEFAULT_COMMISSION_RATE), 10_000);
    }

    #[test]
    fn test_commission_rounds_half_up() {
        // 333 * 0.15 = 49.95
        assert_eq!(platform_commission(333, 0.15), 50);
        // 101 * 0.105 = 10.605
        assert_eq!(platform_commission(101, 0.105), 11);
        // 150 * 0.01 = 1.5, half rounds away from zero
        assert_eq!(platform_commission(150, 0.01), 2);
    }

    #[test]
    fn test_commission_zero_cases() {
        assert_eq!(platform_commission(0, 0.2), 0);
        assert_eq!(platform_commission(50_000, 0.0), 0);
    }

    #[test]
    fn test_set_rate_request_bounds() {
        assert!(SetRateRequest { rate: 0.0 }.validate().is_ok());
        assert!(SetRateRequest { rate: 0.5 }.validate().is_ok());
        assert!(SetRateRequest { rate: 0.51 }.validate().is_err());
        assert!(SetRateRequest { rate: -0.01 }.validate().is_err());
    }
}
