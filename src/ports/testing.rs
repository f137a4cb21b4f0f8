//! In-memory repository double for service and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, Utc};

use super::{RepositoryError, RepositoryResult, TransactionRepository};
use crate::domain::{
    NewTransaction, StatusCounts, Transaction, TransactionFilters, TransactionStatus,
    TransactionUpdate,
};

#[derive(Default)]
struct Inner {
    rows: Vec<Transaction>,
    next_id: i64,
    calls: Vec<&'static str>,
    failing: Option<&'static str>,
}

/// Records every call by method name and can be told to fail one method.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    inner: Mutex<Inner>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Transaction>) -> Self {
        let next_id = rows.iter().map(|tx| tx.id).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                rows,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Makes the named method return a database error.
    pub fn fail_on(self, method: &'static str) -> Self {
        self.inner.lock().unwrap().failing = Some(method);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn rows(&self) -> Vec<Transaction> {
        self.inner.lock().unwrap().rows.clone()
    }

    fn enter(&self, method: &'static str) -> RepositoryResult<std::sync::MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(method);
        if inner.failing == Some(method) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(inner)
    }
}

pub fn transaction(id: i64, user_id: i64, amount: &str, status: TransactionStatus) -> Transaction {
    transaction_at(id, user_id, amount, status, Utc::now())
}

pub fn transaction_at(
    id: i64,
    user_id: i64,
    amount: &str,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id,
        user_id,
        amount: amount.parse().expect("valid decimal"),
        status,
        created_at,
        updated_at: created_at,
    }
}

fn newest_first(rows: &mut [Transaction]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, tx: &NewTransaction) -> RepositoryResult<Transaction> {
        let mut inner = self.enter("create")?;
        inner.next_id += 1;
        let now = Utc::now();
        let created = Transaction {
            id: inner.next_id,
            user_id: tx.user_id,
            amount: tx.amount.with_scale(2),
            status: tx.status,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Transaction> {
        let inner = self.enter("get_by_id")?;
        inner
            .rows
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn get_all(&self, filters: &TransactionFilters) -> RepositoryResult<Vec<Transaction>> {
        let inner = self.enter("get_all")?;
        let mut rows: Vec<Transaction> = inner
            .rows
            .iter()
            .filter(|tx| filters.user_id.map_or(true, |user_id| tx.user_id == user_id))
            .filter(|tx| {
                filters
                    .status
                    .as_deref()
                    .map_or(true, |status| tx.status.as_str() == status)
            })
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows
            .into_iter()
            .skip(filters.effective_offset() as usize)
            .take(filters.effective_limit() as usize)
            .collect())
    }

    async fn update(&self, id: i64, changes: &TransactionUpdate) -> RepositoryResult<()> {
        let mut inner = self.enter("update")?;
        if let Some(tx) = inner.rows.iter_mut().find(|tx| tx.id == id) {
            if let Some(status) = changes.status {
                tx.status = status;
            }
            tx.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut inner = self.enter("delete")?;
        inner.rows.retain(|tx| tx.id != id);
        Ok(())
    }

    async fn get_today_successful(&self) -> RepositoryResult<(i64, BigDecimal)> {
        let inner = self.enter("get_today_successful")?;
        let today = Local::now().date_naive();
        let todays: Vec<&Transaction> = inner
            .rows
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Success)
            .filter(|tx| tx.created_at.with_timezone(&Local).date_naive() == today)
            .collect();
        let total = todays
            .iter()
            .fold(BigDecimal::from(0), |acc, tx| acc + &tx.amount);
        Ok((todays.len() as i64, total))
    }

    async fn get_average_per_user(&self) -> RepositoryResult<BigDecimal> {
        let inner = self.enter("get_average_per_user")?;
        let mut users: Vec<i64> = inner.rows.iter().map(|tx| tx.user_id).collect();
        users.sort_unstable();
        users.dedup();
        if users.is_empty() {
            return Ok(BigDecimal::from(0));
        }
        Ok(BigDecimal::from(inner.rows.len() as i64) / BigDecimal::from(users.len() as i64))
    }

    async fn get_latest(&self, limit: i64) -> RepositoryResult<Vec<Transaction>> {
        let inner = self.enter("get_latest")?;
        let mut rows = inner.rows.clone();
        newest_first(&mut rows);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn get_status_counts(&self) -> RepositoryResult<StatusCounts> {
        let inner = self.enter("get_status_counts")?;
        let count = |status: TransactionStatus| {
            inner.rows.iter().filter(|tx| tx.status == status).count() as i64
        };
        Ok(StatusCounts {
            success: count(TransactionStatus::Success),
            pending: count(TransactionStatus::Pending),
            failed: count(TransactionStatus::Failed),
        })
    }
}
