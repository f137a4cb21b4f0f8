pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod telemetry;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;

use crate::adapters::PostgresTransactionRepository;
use crate::ports::TransactionRepository;
use crate::services::{DashboardManager, DashboardService, TransactionManager, TransactionService};

#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<dyn TransactionService>,
    pub dashboard: Arc<dyn DashboardService>,
    pub log_request_body: bool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::with_repository(Arc::new(PostgresTransactionRepository::new(pool)))
    }

    /// Wires both services over the same storage.
    pub fn with_repository(repository: Arc<dyn TransactionRepository>) -> Self {
        Self {
            transactions: Arc::new(TransactionManager::new(repository.clone())),
            dashboard: Arc::new(DashboardManager::new(repository)),
            log_request_body: false,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/api/transactions/:id",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .layer(middleware::recovery::layer())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_logger::request_logger_middleware,
        ))
        .with_state(state)
}
