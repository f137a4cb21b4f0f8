use bigdecimal::BigDecimal;
use serde::Serialize;

use super::Transaction;

/// Per-status row counts. The three statuses are fixed, so these are plain fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub success: i64,
    pub pending: i64,
    pub failed: i64,
}

/// Aggregate view computed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub today_successful_transactions: i64,
    #[serde(with = "crate::utils::decimal")]
    pub today_successful_amount: BigDecimal,
    #[serde(with = "crate::utils::decimal")]
    pub average_transaction_per_user: BigDecimal,
    pub latest_transactions: Vec<Transaction>,
    pub status_counts: StatusCounts,
}
