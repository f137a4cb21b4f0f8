//! Request-surface validation run by handlers before calling a service.

use std::fmt;

use bigdecimal::BigDecimal;

use crate::domain::{CreateTransactionRequest, TransactionStatus, UpdateTransactionRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_min(field: &'static str, value: i64, min: i64) -> ValidationResult {
    if value < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {}", min),
        ));
    }

    Ok(())
}

pub fn validate_enum(field: &'static str, value: &str, allowed: &[&str]) -> ValidationResult {
    if allowed.iter().all(|candidate| value != *candidate) {
        return Err(ValidationError::new(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

pub fn validate_create_request(request: &CreateTransactionRequest) -> ValidationResult {
    validate_min("user_id", request.user_id, 1)?;
    validate_positive_amount(&request.amount)
}

pub fn validate_update_request(request: &UpdateTransactionRequest) -> ValidationResult {
    validate_enum("status", &request.status, &TransactionStatus::names())
}
