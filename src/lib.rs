//! Stock price checker
//!
//! Core library for quote lookups and anonymous, deduplicated stock likes.

pub mod core;
pub mod engine;
pub mod infrastructure;
pub mod quotes;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use engine::{StockData, StockPriceService, StockQuery};
pub use infrastructure::config::{Config, IdentityConfig, QuoteConfig, ServerConfig, StorageConfig};

use thiserror::Error;

/// Main error type for the stock checker
#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] engine::QueryError),

    #[error("Quote lookup error: {0}")]
    Quote(#[from] quotes::QuoteError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Identity error: {0}")]
    Identity(#[from] core::identity::IdentityError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckerError {
    /// True when the caller sent a request we refuse to process
    pub fn is_client_error(&self) -> bool {
        matches!(self, CheckerError::InvalidQuery(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckerError>;
