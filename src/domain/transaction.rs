//! Transaction domain entity.
//! Framework-agnostic representation of a ledger entry and the request
//! shapes that create, filter and mutate it.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller sends no limit or one above [`MAX_PAGE_SIZE`].
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Success,
        TransactionStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(TransactionStatus::as_str).collect()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(TransactionStatus::Pending),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "crate::utils::decimal")]
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values needed to insert a transaction. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
}

impl NewTransaction {
    pub fn pending(user_id: i64, amount: BigDecimal) -> Self {
        Self {
            user_id,
            amount,
            status: TransactionStatus::Pending,
        }
    }
}

/// Fields that may change after creation. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionUpdate {
    pub status: Option<TransactionStatus>,
}

impl TransactionUpdate {
    pub fn status(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}

/// Listing filters. `status` is kept raw so the service can reject unknown
/// values before any storage access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilters {
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl TransactionFilters {
    /// Zero and anything above [`MAX_PAGE_SIZE`] fall back to [`DEFAULT_PAGE_SIZE`].
    pub fn effective_limit(&self) -> i64 {
        if self.limit <= 0 || self.limit > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit
        }
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// Body of `POST /api/transactions`. There is deliberately no status field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateTransactionRequest {
    pub user_id: i64,
    #[serde(with = "crate::utils::decimal")]
    pub amount: BigDecimal,
}

/// Body of `PUT /api/transactions/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTransactionRequest {
    pub status: String,
}
