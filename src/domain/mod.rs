pub mod dashboard;
pub mod transaction;

pub use dashboard::{DashboardSummary, StatusCounts};
pub use transaction::{
    CreateTransactionRequest, NewTransaction, Transaction, TransactionFilters, TransactionStatus,
    TransactionUpdate, UnknownStatus, UpdateTransactionRequest,
};
