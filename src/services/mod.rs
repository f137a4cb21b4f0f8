pub mod dashboard;
pub mod error;
pub mod transaction;

pub use dashboard::{DashboardManager, DashboardService, LATEST_TRANSACTIONS_LIMIT};
pub use error::{ServiceError, ServiceResult, SummaryQuery};
pub use transaction::{TransactionManager, TransactionService};
