//! Shared test fixtures
//!
//! Hashing uses a handful of PBKDF2 rounds so tests stay fast.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use crate::core::{IdentityHasher, IdentityParams};
use crate::engine::StockPriceService;
use crate::infrastructure::metrics::MetricsCollector;
use crate::quotes::FixedQuotes;
use crate::storage::MemoryStore;

pub const CALLER_A: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1));
pub const CALLER_B: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 2));

/// Hasher with default salt and key length but few rounds
pub fn test_hasher() -> IdentityHasher {
    IdentityHasher::new(IdentityParams {
        iterations: 8,
        ..IdentityParams::default()
    })
    .expect("valid test params")
}

/// Prices for every symbol the tests touch
pub fn test_quotes() -> FixedQuotes {
    [
        ("GOOG", 172.5),
        ("GOOGL", 171.25),
        ("AAPL", 225.0),
        ("AAT", 30.0),
        ("ABNB", 140.0),
    ]
    .into_iter()
    .collect()
}

/// Service over a fresh in-memory store
pub fn memory_service() -> StockPriceService<MemoryStore, FixedQuotes> {
    StockPriceService::new(
        Arc::new(MemoryStore::new()),
        test_quotes(),
        test_hasher(),
        Arc::new(MetricsCollector::new()),
    )
}

/// Owned query pairs from literals
pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
