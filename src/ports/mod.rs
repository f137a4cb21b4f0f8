//! Storage port for transactions.
//! Services depend on this trait; the Postgres adapter implements it.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::domain::{NewTransaction, StatusCounts, Transaction, TransactionFilters, TransactionUpdate};

#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid row: {0}")]
    Decode(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, tx: &NewTransaction) -> RepositoryResult<Transaction>;

    /// Fails with [`RepositoryError::NotFound`] when no row has this id.
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Transaction>;

    /// Newest first. Pagination is normalized with the filter clamp.
    async fn get_all(&self, filters: &TransactionFilters) -> RepositoryResult<Vec<Transaction>>;

    /// Does not report whether a row matched.
    async fn update(&self, id: i64, changes: &TransactionUpdate) -> RepositoryResult<()>;

    /// Does not report whether a row matched.
    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// Count and summed amount of successful transactions created today.
    async fn get_today_successful(&self) -> RepositoryResult<(i64, BigDecimal)>;

    async fn get_average_per_user(&self) -> RepositoryResult<BigDecimal>;

    async fn get_latest(&self, limit: i64) -> RepositoryResult<Vec<Transaction>>;

    async fn get_status_counts(&self) -> RepositoryResult<StatusCounts>;
}
