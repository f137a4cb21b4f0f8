//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::{
    NewTransaction, StatusCounts, Transaction, TransactionFilters, TransactionStatus,
    TransactionUpdate,
};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const COLUMNS: &str = "id, user_id, amount, status, created_at, updated_at";

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, tx: &NewTransaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "INSERT INTO transactions (user_id, amount, status) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(tx.user_id)
        .bind(&tx.amount)
        .bind(tx.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(user_id = tx.user_id, "failed to insert transaction: {e}");
            RepositoryError::from(e)
        })?;

        row.into_domain()
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or(RepositoryError::NotFound(id))?.into_domain()
    }

    async fn get_all(&self, filters: &TransactionFilters) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM transactions
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
              AND ($2::VARCHAR IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filters.user_id)
        .bind(filters.status.as_deref())
        .bind(filters.effective_limit())
        .bind(filters.effective_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("failed to list transactions: {e}");
            RepositoryError::from(e)
        })?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn update(&self, id: i64, changes: &TransactionUpdate) -> RepositoryResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE transactions SET updated_at = NOW()");
        if let Some(status) = changes.status {
            query.push(", status = ").push_bind(status.as_str());
        }
        query.push(" WHERE id = ").push_bind(id);

        query.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!(transaction_id = id, "failed to update transaction: {e}");
            RepositoryError::from(e)
        })?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(transaction_id = id, "failed to delete transaction: {e}");
                RepositoryError::from(e)
            })?;

        Ok(())
    }

    async fn get_today_successful(&self) -> RepositoryResult<(i64, BigDecimal)> {
        let (start, end) = day_bounds(&Local::now());

        // Count and sum come from one statement so they describe the same rows.
        let (count, total) = sqlx::query_as::<_, (i64, BigDecimal)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE status = $1 AND created_at >= $2 AND created_at < $3
            "#,
        )
        .bind(TransactionStatus::Success.as_str())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok((count, total))
    }

    async fn get_average_per_user(&self) -> RepositoryResult<BigDecimal> {
        let average = sqlx::query_scalar::<_, BigDecimal>(
            r#"
            SELECT COALESCE(AVG(user_transaction_count), 0)::NUMERIC
            FROM (
                SELECT user_id, COUNT(*) AS user_transaction_count
                FROM transactions
                GROUP BY user_id
            ) AS user_counts
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(average)
    }

    async fn get_latest(&self, limit: i64) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn get_status_counts(&self) -> RepositoryResult<StatusCounts> {
        let (success, pending, failed) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'success'),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'failed')
            FROM transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(StatusCounts {
            success,
            pending,
            failed,
        })
    }
}

/// UTC `[start, end)` covering the calendar day of `now` in its own timezone.
fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN);
    let end = start + Duration::days(1);
    let zone = now.timezone();
    let resolve = |naive: &NaiveDateTime| {
        zone.from_local_datetime(naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    };
    (
        first_valid_instant(start, resolve),
        first_valid_instant(end, resolve),
    )
}

const GAP_STEP_MINUTES: i64 = 15;
const MAX_GAP_STEPS: i64 = 12;

/// Resolves a local wall-clock time to UTC. When it falls in a DST gap (some
/// zones skip midnight) the first valid local instant after it is used.
fn first_valid_instant<F>(naive: NaiveDateTime, resolve: F) -> DateTime<Utc>
where
    F: Fn(&NaiveDateTime) -> Option<DateTime<Utc>>,
{
    (0..=MAX_GAP_STEPS)
        .map(|step| naive + Duration::minutes(step * GAP_STEP_MINUTES))
        .find_map(|candidate| resolve(&candidate))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    user_id: i64,
    amount: BigDecimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status = self
            .status
            .parse::<TransactionStatus>()
            .map_err(|e| RepositoryError::Decode(format!("transaction {}: {e}", self.id)))?;

        Ok(Transaction {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
