//! Campaign application pipeline
//!
//! Campaign creation, application intake, and the accept-to-deal
//! conversion. Acceptance re-checks its preconditions and creates the
//! deal inside one database transaction, going through the same
//! creation path and commission resolver as direct offers.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::campaigns::model::{
    ApplicationDecision, ApplicationOutcome, ApplicationWithBlogger, ApplyCampaignRequest,
    CreateCampaignRequest, UpdateApplicationRequest,
};
use crate::deals::DealService;
use crate::error::{ApiError, ApiResult};
use crate::models::{ApplicationStatus, Campaign, CampaignApplication, CampaignStatus};
use crate::profiles::ProfileService;

#[derive(Clone)]
pub struct CampaignService {
    db_pool: PgPool,
    deals: DealService,
    profiles: ProfileService,
}

/// Campaign row joined with its owner's user id
#[derive(Debug, sqlx::FromRow)]
struct CampaignWithOwner {
    #[sqlx(flatten)]
    campaign: Campaign,
    owner_user_id: Uuid,
}

impl CampaignService {
    pub fn new(db_pool: PgPool, deals: DealService, profiles: ProfileService) -> Self {
        Self {
            db_pool,
            deals,
            profiles,
        }
    }

    /// Create a campaign. Only verified issuers may post.
    pub async fn create_campaign(
        &self,
        issuer_user_id: Uuid,
        request: CreateCampaignRequest,
    ) -> ApiResult<Campaign> {
        let issuer = self.profiles.find_issuer_by_user(issuer_user_id).await?;

        if !issuer.is_verified {
            return Err(ApiError::Forbidden(
                "Your account must be verified to create campaigns".to_string(),
            ));
        }

        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (id, issuer_id, title, brief, currency, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(issuer.id)
        .bind(&request.title)
        .bind(&request.brief)
        .bind(request.currency)
        .bind(CampaignStatus::Active)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(campaign_id = %campaign.id, "Campaign created");

        Ok(campaign)
    }

    /// Apply to a campaign as a blogger. One application per
    /// (campaign, blogger); a duplicate is rejected up front and the
    /// unique index backstops the race.
    pub async fn apply(
        &self,
        blogger_user_id: Uuid,
        campaign_id: Uuid,
        request: ApplyCampaignRequest,
    ) -> ApiResult<CampaignApplication> {
        Self::campaign_with_owner(&self.db_pool, campaign_id).await?;

        let blogger = self.profiles.find_blogger_by_user(blogger_user_id).await?;

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM campaign_applications WHERE campaign_id = $1 AND blogger_id = $2",
        )
        .bind(campaign_id)
        .bind(blogger.id)
        .fetch_optional(&self.db_pool)
        .await?;

        if existing.is_some() {
            return Err(ApiError::InvalidInput(
                "You have already applied to this campaign".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, CampaignApplication>(
            r#"
            INSERT INTO campaign_applications (
                id, campaign_id, blogger_id, pitch, proposed_price, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign_id)
        .bind(blogger.id)
        .bind(&request.pitch)
        .bind(request.proposed_price)
        .bind(ApplicationStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::InvalidInput("You have already applied to this campaign".to_string())
            }
            _ => ApiError::from(e),
        })?;

        tracing::info!(
            campaign_id = %campaign_id,
            application_id = %application.id,
            "Campaign application received"
        );

        Ok(application)
    }

    /// Applications to a campaign, newest first. Campaign owner only.
    pub async fn applications(
        &self,
        issuer_user_id: Uuid,
        campaign_id: Uuid,
    ) -> ApiResult<Vec<ApplicationWithBlogger>> {
        let row = Self::campaign_with_owner(&self.db_pool, campaign_id).await?;

        if row.owner_user_id != issuer_user_id {
            return Err(ApiError::Forbidden(
                "You can only view applications to your own campaigns".to_string(),
            ));
        }

        let applications = sqlx::query_as::<_, ApplicationWithBlogger>(
            r#"
            SELECT a.*, b.display_name AS blogger_name, b.total_deals AS blogger_total_deals
            FROM campaign_applications a
            JOIN blogger_profiles b ON b.id = a.blogger_id
            WHERE a.campaign_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(applications)
    }

    /// Accept or reject a pending application. Acceptance spawns a deal
    /// from the campaign and the proposed price; the deal insert and
    /// the status flip commit together.
    pub async fn update_application(
        &self,
        issuer_user_id: Uuid,
        campaign_id: Uuid,
        application_id: Uuid,
        request: UpdateApplicationRequest,
    ) -> ApiResult<ApplicationOutcome> {
        let mut tx = self.db_pool.begin().await?;

        let row = Self::campaign_with_owner(&mut *tx, campaign_id).await?;

        if row.owner_user_id != issuer_user_id {
            return Err(ApiError::Forbidden(
                "You can only manage applications to your own campaigns".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, CampaignApplication>(
            "SELECT * FROM campaign_applications WHERE id = $1 FOR UPDATE",
        )
        .bind(application_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

        if application.campaign_id != campaign_id {
            return Err(ApiError::InvalidInput(
                "Application does not belong to this campaign".to_string(),
            ));
        }

        if application.status != ApplicationStatus::Pending {
            return Err(ApiError::InvalidState(
                "Application has already been decided".to_string(),
            ));
        }

        match request.status {
            ApplicationDecision::Accepted => {
                let deal = self
                    .deals
                    .create_for_application(&mut tx, &row.campaign, &application)
                    .await?;

                sqlx::query("UPDATE campaign_applications SET status = $1 WHERE id = $2")
                    .bind(ApplicationStatus::Accepted)
                    .bind(application_id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;

                tracing::info!(
                    application_id = %application_id,
                    deal_id = %deal.id,
                    "Application accepted"
                );

                Ok(ApplicationOutcome::Deal(deal))
            }
            ApplicationDecision::Rejected => {
                let updated = sqlx::query_as::<_, CampaignApplication>(
                    "UPDATE campaign_applications SET status = $1 WHERE id = $2 RETURNING *",
                )
                .bind(ApplicationStatus::Rejected)
                .bind(application_id)
                .fetch_one(&mut *tx)
                .await?;

                tx.commit().await?;

                tracing::info!(application_id = %application_id, "Application rejected");

                Ok(ApplicationOutcome::Application(updated))
            }
        }
    }

    async fn campaign_with_owner<'e, E>(executor: E, campaign_id: Uuid) -> ApiResult<CampaignWithOwner>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as::<_, CampaignWithOwner>(
            r#"
            SELECT c.*, i.user_id AS owner_user_id
            FROM campaigns c
            JOIN issuer_profiles i ON i.id = c.issuer_id
            WHERE c.id = $1
            "#,
        )
        .bind(campaign_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))
    }
}
