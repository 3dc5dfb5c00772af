//! Dispute resolver
//!
//! Admin-side dispute handling. Resolution writes the dispute, the
//! parent deal, and any refund ledger entry in one database
//! transaction.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::deals::model::DealWithParties;
use crate::disputes::model::{DisputeOutcome, DisputeWithDeal, ResolveDisputeRequest};
use crate::error::{ApiError, ApiResult};
use crate::ledger::LedgerService;
use crate::models::{DealStatus, Dispute, DisputeStatus, TransactionType};

#[derive(Clone)]
pub struct DisputeService {
    db_pool: PgPool,
}

impl DisputeService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Close a dispute with an explicit outcome. A refund moves the
    /// deal to REFUNDED and returns the escrowed amount to the issuer;
    /// a dismissal leaves the deal as it stands.
    pub async fn resolve(
        &self,
        dispute_id: Uuid,
        request: ResolveDisputeRequest,
    ) -> ApiResult<Dispute> {
        let mut tx = self.db_pool.begin().await?;

        let dispute =
            sqlx::query_as::<_, Dispute>("SELECT * FROM disputes WHERE id = $1 FOR UPDATE")
                .bind(dispute_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("Dispute not found".to_string()))?;

        if dispute.status == DisputeStatus::Resolved {
            return Err(ApiError::InvalidState(
                "Dispute is already resolved".to_string(),
            ));
        }

        let now = Utc::now();
        let updated = sqlx::query_as::<_, Dispute>(
            r#"
            UPDATE disputes
            SET status = $1, resolution = $2, resolved_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(DisputeStatus::Resolved)
        .bind(&request.resolution)
        .bind(now)
        .bind(dispute_id)
        .fetch_one(&mut *tx)
        .await?;

        if request.outcome == DisputeOutcome::Refund {
            let row = sqlx::query_as::<_, DealWithParties>(
                r#"
                SELECT d.*, i.user_id AS issuer_user_id, b.user_id AS blogger_user_id
                FROM deals d
                JOIN issuer_profiles i ON i.id = d.issuer_id
                JOIN blogger_profiles b ON b.id = d.blogger_id
                WHERE d.id = $1
                FOR UPDATE OF d
                "#,
            )
            .bind(dispute.deal_id)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE deals SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(DealStatus::Refunded)
                .bind(now)
                .bind(dispute.deal_id)
                .execute(&mut *tx)
                .await?;

            LedgerService::record(
                &mut *tx,
                dispute.deal_id,
                row.issuer_user_id,
                TransactionType::Refund,
                row.deal.amount,
                row.deal.currency,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            dispute_id = %dispute_id,
            outcome = ?request.outcome,
            "Dispute resolved"
        );

        Ok(updated)
    }

    /// Disputes awaiting resolution (OPEN and UNDER_REVIEW), oldest
    /// first, with their deal summaries
    pub async fn open_disputes(&self) -> ApiResult<Vec<DisputeWithDeal>> {
        let disputes = sqlx::query_as::<_, DisputeWithDeal>(
            r#"
            SELECT dsp.*,
                   d.title AS deal_title,
                   d.amount AS deal_amount,
                   d.currency AS deal_currency,
                   d.status AS deal_status,
                   i.company_name AS issuer_company,
                   b.display_name AS blogger_name
            FROM disputes dsp
            JOIN deals d ON d.id = dsp.deal_id
            JOIN issuer_profiles i ON i.id = d.issuer_id
            JOIN blogger_profiles b ON b.id = d.blogger_id
            WHERE dsp.status IN ($1, $2)
            ORDER BY dsp.created_at ASC
            "#,
        )
        .bind(DisputeStatus::Open)
        .bind(DisputeStatus::UnderReview)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(disputes)
    }
}
