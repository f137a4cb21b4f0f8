use std::sync::Arc;

use async_trait::async_trait;

use super::{ServiceError, ServiceResult, SummaryQuery};
use crate::domain::DashboardSummary;
use crate::ports::TransactionRepository;

/// Number of recent transactions included in the summary.
pub const LATEST_TRANSACTIONS_LIMIT: i64 = 10;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn get_summary(&self) -> ServiceResult<DashboardSummary>;
}

pub struct DashboardManager {
    repository: Arc<dyn TransactionRepository>,
}

impl DashboardManager {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }
}

fn failed(query: SummaryQuery) -> impl FnOnce(crate::ports::RepositoryError) -> ServiceError {
    move |source| {
        tracing::error!("failed to get {query}: {source}");
        ServiceError::Summary { query, source }
    }
}

#[async_trait]
impl DashboardService for DashboardManager {
    /// Runs the four aggregates in order and stops at the first failure.
    async fn get_summary(&self) -> ServiceResult<DashboardSummary> {
        let (today_count, today_amount) = self
            .repository
            .get_today_successful()
            .await
            .map_err(failed(SummaryQuery::TodaySuccessful))?;

        let average = self
            .repository
            .get_average_per_user()
            .await
            .map_err(failed(SummaryQuery::AveragePerUser))?;

        let latest = self
            .repository
            .get_latest(LATEST_TRANSACTIONS_LIMIT)
            .await
            .map_err(failed(SummaryQuery::Latest))?;

        let status_counts = self
            .repository
            .get_status_counts()
            .await
            .map_err(failed(SummaryQuery::StatusCounts))?;

        Ok(DashboardSummary {
            today_successful_transactions: today_count,
            today_successful_amount: today_amount,
            average_transaction_per_user: average,
            latest_transactions: latest,
            status_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StatusCounts, TransactionStatus};
    use crate::ports::testing::{transaction, transaction_at, InMemoryTransactionRepository};
    use bigdecimal::BigDecimal;
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    #[tokio::test]
    async fn empty_ledger_yields_zero_summary() {
        let repo = Arc::new(InMemoryTransactionRepository::new());
        let summary = DashboardManager::new(repo).get_summary().await.unwrap();

        assert_eq!(summary.today_successful_transactions, 0);
        assert_eq!(summary.today_successful_amount, BigDecimal::from(0));
        assert_eq!(summary.average_transaction_per_user, BigDecimal::from(0));
        assert!(summary.latest_transactions.is_empty());
        assert_eq!(summary.status_counts, StatusCounts::default());
    }

    #[tokio::test]
    async fn summary_merges_all_aggregates() {
        let two_days_ago = Utc::now() - Duration::days(2);
        let repo = Arc::new(InMemoryTransactionRepository::with_rows(vec![
            transaction(1, 1, "100.50", TransactionStatus::Success),
            transaction(2, 1, "200.00", TransactionStatus::Success),
            transaction(3, 2, "50.00", TransactionStatus::Pending),
            transaction(4, 2, "10.00", TransactionStatus::Failed),
            transaction_at(5, 3, "999.99", TransactionStatus::Success, two_days_ago),
        ]));

        let summary = DashboardManager::new(repo.clone()).get_summary().await.unwrap();

        assert_eq!(summary.today_successful_transactions, 2);
        assert_eq!(
            summary.today_successful_amount,
            BigDecimal::from_str("300.50").unwrap()
        );
        assert_eq!(
            summary.average_transaction_per_user,
            BigDecimal::from(5) / BigDecimal::from(3)
        );
        assert_eq!(summary.latest_transactions.len(), 5);
        assert_eq!(summary.latest_transactions[4].id, 5);
        assert_eq!(
            summary.status_counts,
            StatusCounts {
                success: 3,
                pending: 1,
                failed: 1
            }
        );
        assert_eq!(
            repo.calls(),
            vec![
                "get_today_successful",
                "get_average_per_user",
                "get_latest",
                "get_status_counts"
            ]
        );
    }

    #[tokio::test]
    async fn latest_is_capped_at_ten() {
        let rows = (1..=12)
            .map(|id| transaction(id, id, "1.00", TransactionStatus::Pending))
            .collect();
        let repo = Arc::new(InMemoryTransactionRepository::with_rows(rows));

        let summary = DashboardManager::new(repo).get_summary().await.unwrap();
        assert_eq!(summary.latest_transactions.len(), 10);
    }

    #[tokio::test]
    async fn stops_at_first_failing_query() {
        let cases = [
            ("get_today_successful", SummaryQuery::TodaySuccessful, 1),
            ("get_average_per_user", SummaryQuery::AveragePerUser, 2),
            ("get_latest", SummaryQuery::Latest, 3),
            ("get_status_counts", SummaryQuery::StatusCounts, 4),
        ];

        for (method, expected, calls) in cases {
            let repo = Arc::new(InMemoryTransactionRepository::new().fail_on(method));
            let err = DashboardManager::new(repo.clone())
                .get_summary()
                .await
                .unwrap_err();

            match err {
                ServiceError::Summary { query, .. } => assert_eq!(query, expected),
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(repo.calls().len(), calls);
        }
    }
}
