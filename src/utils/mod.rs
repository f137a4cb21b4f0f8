pub mod decimal;
pub mod sanitize;
