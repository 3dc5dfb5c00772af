//! Profile lookups consumed by the deal and campaign flows
//!
//! Profile CRUD lives in a separate subsystem; this service only reads
//! profiles, flips issuer verification, and bumps the completed-deal
//! counters.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{BloggerProfile, IssuerProfile};

#[derive(Clone)]
pub struct ProfileService {
    db_pool: PgPool,
}

impl ProfileService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Issuer profile for a user id
    pub async fn find_issuer_by_user(&self, user_id: Uuid) -> ApiResult<IssuerProfile> {
        let profile = sqlx::query_as::<_, IssuerProfile>(
            "SELECT * FROM issuer_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issuer profile not found".to_string()))?;

        Ok(profile)
    }

    /// Blogger profile for a user id
    pub async fn find_blogger_by_user(&self, user_id: Uuid) -> ApiResult<BloggerProfile> {
        let profile = sqlx::query_as::<_, BloggerProfile>(
            "SELECT * FROM blogger_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blogger profile not found".to_string()))?;

        Ok(profile)
    }

    /// Blogger profile by its own id
    pub async fn find_blogger(&self, blogger_id: Uuid) -> ApiResult<BloggerProfile> {
        let profile =
            sqlx::query_as::<_, BloggerProfile>("SELECT * FROM blogger_profiles WHERE id = $1")
                .bind(blogger_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Blogger not found".to_string()))?;

        Ok(profile)
    }

    /// Mark an issuer as verified (admin action)
    pub async fn verify_issuer(&self, issuer_id: Uuid) -> ApiResult<IssuerProfile> {
        let profile = sqlx::query_as::<_, IssuerProfile>(
            r#"
            UPDATE issuer_profiles
            SET is_verified = TRUE, verified_at = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(issuer_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issuer not found".to_string()))?;

        tracing::info!(issuer_id = %issuer_id, "Issuer verified");

        Ok(profile)
    }

    /// Issuers awaiting verification, oldest first
    pub async fn pending_issuers(&self) -> ApiResult<Vec<IssuerProfile>> {
        let profiles = sqlx::query_as::<_, IssuerProfile>(
            "SELECT * FROM issuer_profiles WHERE is_verified = FALSE ORDER BY created_at ASC",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(profiles)
    }

    /// Bump both parties' completed-deal counters.
    ///
    /// Takes an open connection so the bumps commit together with the
    /// deal-confirmation writes.
    pub async fn increment_total_deals(
        conn: &mut PgConnection,
        issuer_id: Uuid,
        blogger_id: Uuid,
    ) -> ApiResult<()> {
        sqlx::query("UPDATE issuer_profiles SET total_deals = total_deals + 1 WHERE id = $1")
            .bind(issuer_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("UPDATE blogger_profiles SET total_deals = total_deals + 1 WHERE id = $1")
            .bind(blogger_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
