//! Static price table

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{QuoteError, QuoteSource};
use crate::core::Symbol;

/// Serves prices from a fixed table; unknown symbols fail like the proxy does
#[derive(Debug, Default)]
pub struct FixedQuotes {
    prices: HashMap<String, f64>,
    lookups: AtomicU64,
}

impl FixedQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a price
    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_ascii_uppercase(), price);
        self
    }

    /// Number of lookups served so far, failed ones included
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FixedQuotes {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |quotes, (symbol, price)| quotes.with_price(symbol, price))
    }
}

impl QuoteSource for FixedQuotes {
    async fn latest_price(&self, symbol: &Symbol) -> Result<f64, QuoteError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.prices
            .get(symbol.as_str())
            .copied()
            .ok_or_else(|| QuoteError::UnknownSymbol(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_fixed_prices() {
        let quotes: FixedQuotes = [("goog", 172.5), ("AAPL", 225.0)].into_iter().collect();

        let goog = Symbol::parse("GOOG").unwrap();
        assert_eq!(assert_ok!(quotes.latest_price(&goog).await), 172.5);

        let missing = Symbol::parse("NOPE").unwrap();
        let err = assert_err!(quotes.latest_price(&missing).await);
        assert!(matches!(err, QuoteError::UnknownSymbol(_)));
        assert_eq!(quotes.lookups(), 2);
    }
}
