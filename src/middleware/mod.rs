pub mod cors;
pub mod recovery;
pub mod request_logger;
