//! Quote lookups
//!
//! The price source is an external collaborator. `HttpQuoteClient` talks to
//! the quote proxy; `FixedQuotes` serves a static table for offline runs.

pub mod client;
pub mod fixed;

pub use client::HttpQuoteClient;
pub use fixed::FixedQuotes;

use crate::core::Symbol;
use std::future::Future;

/// Source of latest prices
///
/// # Design Notes
/// - Generic, not boxed: the service is monomorphized over its source
/// - The returned future is `Send` so handlers can run on any worker
pub trait QuoteSource: Send + Sync {
    /// Latest traded price for `symbol`
    fn latest_price(&self, symbol: &Symbol) -> impl Future<Output = Result<f64, QuoteError>> + Send;
}

impl<T: QuoteSource> QuoteSource for std::sync::Arc<T> {
    fn latest_price(&self, symbol: &Symbol) -> impl Future<Output = Result<f64, QuoteError>> + Send {
        (**self).latest_price(symbol)
    }
}

/// Quote lookup errors
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid quote URL: {0}")]
    InvalidUrl(String),
}
