//! Business rules for creating, reading, re-statusing and deleting transactions.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ServiceError, ServiceResult};
use crate::domain::{
    CreateTransactionRequest, NewTransaction, Transaction, TransactionFilters, TransactionStatus,
    TransactionUpdate,
};
use crate::ports::{RepositoryError, TransactionRepository};

#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn create_transaction(&self, request: CreateTransactionRequest)
        -> ServiceResult<Transaction>;

    async fn get_transaction(&self, id: i64) -> ServiceResult<Transaction>;

    async fn get_transactions(&self, filters: TransactionFilters) -> ServiceResult<Vec<Transaction>>;

    async fn update_transaction_status(&self, id: i64, status: &str) -> ServiceResult<()>;

    async fn delete_transaction(&self, id: i64) -> ServiceResult<()>;
}

pub struct TransactionManager {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionManager {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    /// Loads the transaction so update and delete can report a precise not-found;
    /// the store's own update/delete do not say whether a row matched.
    async fn find_existing(&self, id: i64) -> ServiceResult<Transaction> {
        self.repository.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound(id) => {
                tracing::info!(transaction_id = id, "transaction not found");
                ServiceError::NotFound(id)
            }
            other => ServiceError::Retrieve(other),
        })
    }
}

#[async_trait]
impl TransactionService for TransactionManager {
    async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> ServiceResult<Transaction> {
        let new_tx = NewTransaction::pending(request.user_id, request.amount);

        let created = self
            .repository
            .create(&new_tx)
            .await
            .map_err(ServiceError::Create)?;

        tracing::info!(
            transaction_id = created.id,
            user_id = created.user_id,
            amount = %created.amount,
            "transaction created"
        );
        Ok(created)
    }

    async fn get_transaction(&self, id: i64) -> ServiceResult<Transaction> {
        self.find_existing(id).await
    }

    async fn get_transactions(&self, filters: TransactionFilters) -> ServiceResult<Vec<Transaction>> {
        if let Some(status) = filters.status.as_deref() {
            if status.parse::<TransactionStatus>().is_err() {
                return Err(ServiceError::Validation("invalid status filter".to_string()));
            }
        }

        self.repository
            .get_all(&filters)
            .await
            .map_err(ServiceError::List)
    }

    async fn update_transaction_status(&self, id: i64, status: &str) -> ServiceResult<()> {
        let status = status
            .parse::<TransactionStatus>()
            .map_err(|_| ServiceError::Validation("invalid status".to_string()))?;

        let existing = self.find_existing(id).await?;

        self.repository
            .update(id, &TransactionUpdate::status(status))
            .await
            .map_err(ServiceError::Update)?;

        tracing::info!(
            transaction_id = id,
            from = %existing.status,
            to = %status,
            "transaction status updated"
        );
        Ok(())
    }

    async fn delete_transaction(&self, id: i64) -> ServiceResult<()> {
        self.find_existing(id).await?;

        self.repository
            .delete(id)
            .await
            .map_err(ServiceError::Delete)?;

        tracing::info!(transaction_id = id, "transaction deleted");
        Ok(())
    }
}
