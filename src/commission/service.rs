//! Commission resolver
//!
//! Resolves the effective platform rate for a blogger and backs the
//! admin rate-management surface. Resolution order: per-blogger
//! override, then the global row, then the hardcoded default.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::commission::model::{BloggerRate, CommissionOverview, DEFAULT_COMMISSION_RATE};
use crate::error::{ApiError, ApiResult};
use crate::models::CommissionSetting;

#[derive(Clone)]
pub struct CommissionService {
    db_pool: PgPool,
}

impl CommissionService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Effective rate for a blogger at this moment. Stored values are
    /// trusted as-is; only writes are range-checked.
    pub async fn effective_rate(&self, blogger_id: Uuid) -> ApiResult<f64> {
        let specific: Option<f64> =
            sqlx::query_scalar("SELECT rate FROM commission_settings WHERE blogger_id = $1")
                .bind(blogger_id)
                .fetch_optional(&self.db_pool)
                .await?;

        if let Some(rate) = specific {
            return Ok(rate);
        }

        let global: Option<f64> =
            sqlx::query_scalar("SELECT rate FROM commission_settings WHERE blogger_id IS NULL")
                .fetch_optional(&self.db_pool)
                .await?;

        Ok(global.unwrap_or(DEFAULT_COMMISSION_RATE))
    }

    /// Current configuration: global rate plus all per-blogger overrides
    pub async fn overview(&self) -> ApiResult<CommissionOverview> {
        let global: Option<f64> =
            sqlx::query_scalar("SELECT rate FROM commission_settings WHERE blogger_id IS NULL")
                .fetch_optional(&self.db_pool)
                .await?;

        let blogger_rates = sqlx::query_as::<_, BloggerRate>(
            r#"
            SELECT cs.blogger_id, b.display_name AS blogger_name, cs.rate, cs.updated_at
            FROM commission_settings cs
            JOIN blogger_profiles b ON b.id = cs.blogger_id
            WHERE cs.blogger_id IS NOT NULL
            ORDER BY cs.updated_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(CommissionOverview {
            global_rate: global.unwrap_or(DEFAULT_COMMISSION_RATE),
            blogger_rates,
        })
    }

    /// Set the global rate (single row; upserted)
    pub async fn set_global_rate(&self, rate: f64) -> ApiResult<CommissionSetting> {
        Self::check_rate(rate)?;

        let setting = sqlx::query_as::<_, CommissionSetting>(
            r#"
            INSERT INTO commission_settings (id, blogger_id, rate, created_at, updated_at)
            VALUES ($1, NULL, $2, $3, $3)
            ON CONFLICT ((blogger_id IS NULL)) WHERE blogger_id IS NULL
            DO UPDATE SET rate = EXCLUDED.rate, updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(rate)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(rate = rate, "Global commission rate updated");

        Ok(setting)
    }

    /// Upsert a per-blogger override
    pub async fn set_blogger_rate(
        &self,
        blogger_id: Uuid,
        rate: f64,
    ) -> ApiResult<CommissionSetting> {
        Self::check_rate(rate)?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM blogger_profiles WHERE id = $1")
                .bind(blogger_id)
                .fetch_optional(&self.db_pool)
                .await?;

        if exists.is_none() {
            return Err(ApiError::NotFound("Blogger not found".to_string()));
        }

        let setting = sqlx::query_as::<_, CommissionSetting>(
            r#"
            INSERT INTO commission_settings (id, blogger_id, rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (blogger_id) WHERE blogger_id IS NOT NULL
            DO UPDATE SET rate = EXCLUDED.rate, updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(blogger_id)
        .bind(rate)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(blogger_id = %blogger_id, rate = rate, "Blogger commission rate updated");

        Ok(setting)
    }

    /// Remove a per-blogger override; the blogger reverts to the global
    /// rate. Deleting an absent override is a no-op.
    pub async fn reset_blogger_rate(&self, blogger_id: Uuid) -> ApiResult<()> {
        sqlx::query("DELETE FROM commission_settings WHERE blogger_id = $1")
            .bind(blogger_id)
            .execute(&self.db_pool)
            .await?;

        tracing::info!(blogger_id = %blogger_id, "Blogger commission reset to global rate");

        Ok(())
    }

    fn check_rate(rate: f64) -> ApiResult<()> {
        if !(0.0..=0.5).contains(&rate) {
            return Err(ApiError::InvalidInput(
                "Rate must be between 0 and 0.5".to_string(),
            ));
        }
        Ok(())
    }
}
