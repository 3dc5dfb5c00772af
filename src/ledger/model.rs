//! Ledger types

use serde::Serialize;

pub use crate::models::{Transaction, TransactionStatus, TransactionType};

/// Settled totals per movement type, for the admin reporting surface
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LedgerSummary {
    pub escrow_deposits: i64,
    pub blogger_payouts: i64,
    pub refunds: i64,
    pub platform_fees: i64,
}
