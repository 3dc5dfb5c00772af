//! Transaction ledger
//!
//! Append-only money-movement records tied to deals. Rows are written
//! settled and never updated or deleted; corrections are offsetting
//! entries. Appends accept any executor so a state transition can pass
//! its open database transaction and commit both writes together.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::ledger::model::LedgerSummary;
use crate::models::{Currency, Transaction, TransactionStatus, TransactionType};

#[derive(Clone)]
pub struct LedgerService {
    db_pool: PgPool,
}

impl LedgerService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Append one settled ledger row
    pub async fn record<'e, E>(
        executor: E,
        deal_id: Uuid,
        user_id: Uuid,
        tx_type: TransactionType,
        amount: i64,
        currency: Currency,
    ) -> ApiResult<Transaction>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                id, deal_id, user_id, tx_type, amount, currency, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(deal_id)
        .bind(user_id)
        .bind(tx_type)
        .bind(amount)
        .bind(currency)
        .bind(TransactionStatus::Completed)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        Ok(transaction)
    }

    /// Ledger rows for a deal, oldest first
    pub async fn list_for_deal(&self, deal_id: Uuid) -> ApiResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE deal_id = $1 ORDER BY created_at ASC",
        )
        .bind(deal_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rows)
    }

    /// Sum of settled escrow deposits across all deals
    pub async fn escrow_deposit_total(&self) -> ApiResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM transactions
            WHERE tx_type = $1 AND status = $2
            "#,
        )
        .bind(TransactionType::EscrowDeposit)
        .bind(TransactionStatus::Completed)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(total)
    }

    /// Sum of settled platform fees in a created_at range
    pub async fn platform_fee_total_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ApiResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM transactions
            WHERE tx_type = $1 AND status = $2
              AND created_at >= $3 AND created_at <= $4
            "#,
        )
        .bind(TransactionType::PlatformFee)
        .bind(TransactionStatus::Completed)
        .bind(from)
        .bind(to)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(total)
    }

    /// Settled totals per movement type
    pub async fn summary(&self) -> ApiResult<LedgerSummary> {
        let summary = sqlx::query_as::<_, LedgerSummary>(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE tx_type = 'ESCROW_DEPOSIT'), 0)::BIGINT AS escrow_deposits,
                COALESCE(SUM(amount) FILTER (WHERE tx_type = 'BLOGGER_PAYOUT'), 0)::BIGINT AS blogger_payouts,
                COALESCE(SUM(amount) FILTER (WHERE tx_type = 'REFUND'), 0)::BIGINT AS refunds,
                COALESCE(SUM(amount) FILTER (WHERE tx_type = 'PLATFORM_FEE'), 0)::BIGINT AS platform_fees
            FROM transactions
            WHERE status = 'COMPLETED'
            "#,
        )
        .fetch_one(&self.db_pool)
        .await?;

        Ok(summary)
    }
}
