use std::fmt;

use thiserror::Error;

use crate::ports::RepositoryError;

/// Which dashboard aggregate was being computed when storage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryQuery {
    TodaySuccessful,
    AveragePerUser,
    Latest,
    StatusCounts,
}

impl fmt::Display for SummaryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SummaryQuery::TodaySuccessful => "today's successful transactions",
            SummaryQuery::AveragePerUser => "average transactions per user",
            SummaryQuery::Latest => "latest transactions",
            SummaryQuery::StatusCounts => "status counts",
        })
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("transaction not found")]
    NotFound(i64),

    #[error("failed to create transaction: {0}")]
    Create(#[source] RepositoryError),

    #[error("failed to get transaction: {0}")]
    Retrieve(#[source] RepositoryError),

    #[error("failed to get transactions: {0}")]
    List(#[source] RepositoryError),

    #[error("failed to update transaction: {0}")]
    Update(#[source] RepositoryError),

    #[error("failed to delete transaction: {0}")]
    Delete(#[source] RepositoryError),

    #[error("failed to get {query}: {source}")]
    Summary {
        query: SummaryQuery,
        source: RepositoryError,
    },
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_error_names_the_failed_query() {
        let err = ServiceError::Summary {
            query: SummaryQuery::AveragePerUser,
            source: RepositoryError::Database(sqlx::Error::PoolTimedOut),
        };
        assert!(err
            .to_string()
            .starts_with("failed to get average transactions per user:"));
    }

    #[test]
    fn not_found_message_is_stable() {
        assert_eq!(ServiceError::NotFound(3).to_string(), "transaction not found");
        assert!(ServiceError::NotFound(3).is_not_found());
        assert!(!ServiceError::Validation("invalid status".into()).is_not_found());
    }
}
