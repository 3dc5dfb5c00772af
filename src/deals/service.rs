//! Deal state machine
//!
//! Lifecycle transitions with precondition enforcement. Every mutating
//! operation runs in one database transaction with the deal row locked,
//! so the status write and its ledger entry commit or fail together and
//! concurrent transitions against the same deal serialize. Authorization
//! is checked before the status precondition so the two failures stay
//! distinguishable.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::commission::{platform_commission, CommissionService};
use crate::deals::model::{
    CreateDealRequest, DealWithParties, OpenDisputeRequest, SubmitContentRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::ledger::LedgerService;
use crate::models::{
    Campaign, CampaignApplication, Currency, Deal, DealStatus, Dispute, DisputeSide,
    DisputeStatus, Transaction, TransactionType, UserRole,
};
use crate::profiles::ProfileService;

#[derive(Clone)]
pub struct DealService {
    db_pool: PgPool,
    commission: CommissionService,
    ledger: LedgerService,
    profiles: ProfileService,
}

/// Parameters shared by both deal-creation paths
struct NewDeal {
    issuer_id: Uuid,
    blogger_id: Uuid,
    campaign_application_id: Option<Uuid>,
    title: String,
    brief: Option<String>,
    tz: Option<String>,
    social_platform: Option<String>,
    format_name: Option<String>,
    amount: i64,
    currency: Currency,
    platform_commission: i64,
}

impl DealService {
    pub fn new(
        db_pool: PgPool,
        commission: CommissionService,
        ledger: LedgerService,
        profiles: ProfileService,
    ) -> Self {
        Self {
            db_pool,
            commission,
            ledger,
            profiles,
        }
    }

    /// Create a direct-offer deal. The commission rate is resolved here,
    /// once, and fixed on the row for the deal's lifetime.
    pub async fn create_deal(
        &self,
        issuer_user_id: Uuid,
        request: CreateDealRequest,
    ) -> ApiResult<Deal> {
        let issuer = self.profiles.find_issuer_by_user(issuer_user_id).await?;
        let blogger = self.profiles.find_blogger(request.blogger_id).await?;

        let rate = self.commission.effective_rate(blogger.id).await?;
        let commission = platform_commission(request.amount, rate);

        let deal = Self::insert_deal(
            &self.db_pool,
            NewDeal {
                issuer_id: issuer.id,
                blogger_id: blogger.id,
                campaign_application_id: None,
                title: request.title,
                brief: request.brief,
                tz: request.tz,
                social_platform: request.social_platform,
                format_name: request.format_name,
                amount: request.amount,
                currency: request.currency,
                platform_commission: commission,
            },
        )
        .await?;

        tracing::info!(
            deal_id = %deal.id,
            amount = deal.amount,
            commission = deal.platform_commission,
            "Deal created"
        );

        Ok(deal)
    }

    /// Campaign-acceptance creation path. Shares the resolver and the
    /// insert with direct offers; runs on the caller's open transaction.
    pub async fn create_for_application(
        &self,
        conn: &mut PgConnection,
        campaign: &Campaign,
        application: &CampaignApplication,
    ) -> ApiResult<Deal> {
        let rate = self.commission.effective_rate(application.blogger_id).await?;
        let commission = platform_commission(application.proposed_price, rate);

        let deal = Self::insert_deal(
            &mut *conn,
            NewDeal {
                issuer_id: campaign.issuer_id,
                blogger_id: application.blogger_id,
                campaign_application_id: Some(application.id),
                title: campaign.title.clone(),
                brief: campaign.brief.clone(),
                tz: None,
                social_platform: None,
                format_name: None,
                amount: application.proposed_price,
                currency: campaign.currency,
                platform_commission: commission,
            },
        )
        .await?;

        Ok(deal)
    }

    /// Deals where the caller is a party, newest first. Admins have no
    /// profile and get an empty list.
    pub async fn my_deals(&self, user_id: Uuid, role: UserRole) -> ApiResult<Vec<Deal>> {
        match role {
            UserRole::Blogger => {
                let blogger = self.profiles.find_blogger_by_user(user_id).await?;
                let deals = sqlx::query_as::<_, Deal>(
                    "SELECT * FROM deals WHERE blogger_id = $1 ORDER BY created_at DESC",
                )
                .bind(blogger.id)
                .fetch_all(&self.db_pool)
                .await?;
                Ok(deals)
            }
            UserRole::Issuer => {
                let issuer = self.profiles.find_issuer_by_user(user_id).await?;
                let deals = sqlx::query_as::<_, Deal>(
                    "SELECT * FROM deals WHERE issuer_id = $1 ORDER BY created_at DESC",
                )
                .bind(issuer.id)
                .fetch_all(&self.db_pool)
                .await?;
                Ok(deals)
            }
            UserRole::Admin => Ok(Vec::new()),
        }
    }

    /// Single deal, readable by its issuer, its blogger, or an admin
    pub async fn deal_by_id(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> ApiResult<Deal> {
        let row = self.deal_with_parties(deal_id).await?;

        let is_issuer = role == UserRole::Issuer && row.issuer_user_id == user_id;
        let is_blogger = role == UserRole::Blogger && row.blogger_user_id == user_id;
        let is_admin = role == UserRole::Admin;

        if !is_issuer && !is_blogger && !is_admin {
            return Err(ApiError::Forbidden(
                "You do not have access to this deal".to_string(),
            ));
        }

        Ok(row.deal)
    }

    /// CREATED -> ESCROW_FUNDED, appending the escrow deposit
    pub async fn fund_escrow(&self, deal_id: Uuid, user_id: Uuid) -> ApiResult<Deal> {
        let mut tx = self.db_pool.begin().await?;

        let row = Self::deal_for_update(&mut tx, deal_id).await?;

        if row.issuer_user_id != user_id {
            return Err(ApiError::Forbidden(
                "Only the issuer can fund escrow".to_string(),
            ));
        }

        if row.deal.status != DealStatus::Created {
            return Err(ApiError::InvalidState(
                "Deal must be in CREATED status to fund escrow".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(DealStatus::EscrowFunded)
        .bind(Utc::now())
        .bind(deal_id)
        .fetch_one(&mut *tx)
        .await?;

        LedgerService::record(
            &mut *tx,
            deal_id,
            row.issuer_user_id,
            TransactionType::EscrowDeposit,
            row.deal.amount,
            row.deal.currency,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(deal_id = %deal_id, amount = row.deal.amount, "Escrow funded");

        Ok(updated)
    }

    /// ESCROW_FUNDED -> CONTENT_SUBMITTED, recording the content URL
    pub async fn submit_content(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
        request: SubmitContentRequest,
    ) -> ApiResult<Deal> {
        let mut tx = self.db_pool.begin().await?;

        let row = Self::deal_for_update(&mut tx, deal_id).await?;

        if row.blogger_user_id != user_id {
            return Err(ApiError::Forbidden(
                "Only the assigned blogger can submit content".to_string(),
            ));
        }

        if row.deal.status != DealStatus::EscrowFunded {
            return Err(ApiError::InvalidState(
                "Deal must have funded escrow before submitting content".to_string(),
            ));
        }

        let now = Utc::now();
        let updated = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET status = $1, content_url = $2, content_submitted_at = $3, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(DealStatus::ContentSubmitted)
        .bind(&request.content_url)
        .bind(now)
        .bind(deal_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(deal_id = %deal_id, "Content submitted");

        Ok(updated)
    }

    /// CONTENT_SUBMITTED -> COMPLETED, appending the payout and bumping
    /// both parties' deal counters
    pub async fn confirm_deal(&self, deal_id: Uuid, user_id: Uuid) -> ApiResult<Deal> {
        let mut tx = self.db_pool.begin().await?;

        let row = Self::deal_for_update(&mut tx, deal_id).await?;

        if row.issuer_user_id != user_id {
            return Err(ApiError::Forbidden(
                "Only the issuer can confirm the deal".to_string(),
            ));
        }

        if row.deal.status != DealStatus::ContentSubmitted {
            return Err(ApiError::InvalidState(
                "Content must be submitted before confirming".to_string(),
            ));
        }

        let now = Utc::now();
        let updated = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET status = $1, completed_at = $2, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(DealStatus::Completed)
        .bind(now)
        .bind(deal_id)
        .fetch_one(&mut *tx)
        .await?;

        // The payout belongs to the blogger's user
        LedgerService::record(
            &mut *tx,
            deal_id,
            row.blogger_user_id,
            TransactionType::BloggerPayout,
            row.deal.blogger_amount,
            row.deal.currency,
        )
        .await?;

        ProfileService::increment_total_deals(&mut tx, row.deal.issuer_id, row.deal.blogger_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            deal_id = %deal_id,
            payout = row.deal.blogger_amount,
            "Deal completed"
        );

        Ok(updated)
    }

    /// Open a dispute as either deal party. Freezes the deal in
    /// DISPUTED from any non-terminal state.
    pub async fn open_dispute(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
        role: UserRole,
        request: OpenDisputeRequest,
    ) -> ApiResult<Dispute> {
        let mut tx = self.db_pool.begin().await?;

        let row = Self::deal_for_update(&mut tx, deal_id).await?;

        let is_issuer = role == UserRole::Issuer && row.issuer_user_id == user_id;
        let is_blogger = role == UserRole::Blogger && row.blogger_user_id == user_id;

        if !is_issuer && !is_blogger {
            return Err(ApiError::Forbidden(
                "You do not have permission to open a dispute for this deal".to_string(),
            ));
        }

        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM disputes WHERE deal_id = $1")
                .bind(deal_id)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            return Err(ApiError::InvalidState(
                "A dispute is already open for this deal".to_string(),
            ));
        }

        if row.deal.status.is_terminal() {
            return Err(ApiError::InvalidState(
                "Cannot open a dispute on a closed deal".to_string(),
            ));
        }

        let opened_by = if is_issuer {
            DisputeSide::Issuer
        } else {
            DisputeSide::Blogger
        };

        let dispute = sqlx::query_as::<_, Dispute>(
            r#"
            INSERT INTO disputes (id, deal_id, opened_by, reason, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(deal_id)
        .bind(opened_by)
        .bind(&request.reason)
        .bind(&request.description)
        .bind(DisputeStatus::Open)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE deals SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(DealStatus::Disputed)
            .bind(Utc::now())
            .bind(deal_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(deal_id = %deal_id, dispute_id = %dispute.id, "Dispute opened");

        Ok(dispute)
    }

    /// The deal's dispute, readable by either party or an admin
    pub async fn dispute_for_deal(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> ApiResult<Dispute> {
        let row = self.deal_with_parties(deal_id).await?;

        let dispute = sqlx::query_as::<_, Dispute>("SELECT * FROM disputes WHERE deal_id = $1")
            .bind(deal_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("No dispute found for this deal".to_string()))?;

        let is_issuer = role == UserRole::Issuer && row.issuer_user_id == user_id;
        let is_blogger = role == UserRole::Blogger && row.blogger_user_id == user_id;
        let is_admin = role == UserRole::Admin;

        if !is_issuer && !is_blogger && !is_admin {
            return Err(ApiError::Forbidden(
                "You do not have access to this dispute".to_string(),
            ));
        }

        Ok(dispute)
    }

    /// Ledger rows for a deal, guarded like the deal itself
    pub async fn deal_transactions(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> ApiResult<Vec<Transaction>> {
        self.deal_by_id(deal_id, user_id, role).await?;
        self.ledger.list_for_deal(deal_id).await
    }

    async fn insert_deal<'e, E>(executor: E, new_deal: NewDeal) -> ApiResult<Deal>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (
                id, issuer_id, blogger_id, campaign_application_id,
                title, brief, tz, social_platform, format_name,
                amount, currency, platform_commission, blogger_amount,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_deal.issuer_id)
        .bind(new_deal.blogger_id)
        .bind(new_deal.campaign_application_id)
        .bind(new_deal.title)
        .bind(new_deal.brief)
        .bind(new_deal.tz)
        .bind(new_deal.social_platform)
        .bind(new_deal.format_name)
        .bind(new_deal.amount)
        .bind(new_deal.currency)
        .bind(new_deal.platform_commission)
        // The blogger receives the full nominal amount; the commission
        // is separate bookkeeping
        .bind(new_deal.amount)
        .bind(DealStatus::Created)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        Ok(deal)
    }

    async fn deal_with_parties(&self, deal_id: Uuid) -> ApiResult<DealWithParties> {
        sqlx::query_as::<_, DealWithParties>(
            r#"
            SELECT d.*, i.user_id AS issuer_user_id, b.user_id AS blogger_user_id
            FROM deals d
            JOIN issuer_profiles i ON i.id = d.issuer_id
            JOIN blogger_profiles b ON b.id = d.blogger_id
            WHERE d.id = $1
            "#,
        )
        .bind(deal_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deal not found".to_string()))
    }

    /// Locked variant for state transitions; preconditions are checked
    /// under the row lock
    async fn deal_for_update(
        conn: &mut PgConnection,
        deal_id: Uuid,
    ) -> ApiResult<DealWithParties> {
        sqlx::query_as::<_, DealWithParties>(
            r#"
            SELECT d.*, i.user_id AS issuer_user_id, b.user_id AS blogger_user_id
            FROM deals d
            JOIN issuer_profiles i ON i.id = d.issuer_id
            JOIN blogger_profiles b ON b.id = d.blogger_id
            WHERE d.id = $1
            FOR UPDATE OF d
            "#,
        )
        .bind(deal_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deal not found".to_string()))
    }
}
