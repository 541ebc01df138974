//! Like ledger
//!
//! At most one like per (identity, stock). Counts are read straight from the
//! store, so a like recorded earlier in the same request is always visible.

use crate::core::identity::IdentityToken;
use crate::storage::{IdentityId, IdentityRecord, LikeStore, StockId, StorageError};
use std::sync::Arc;

/// Result of a like attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// False when this identity had already liked the stock
    pub inserted: bool,
}

pub struct LikeLedger<S> {
    store: Arc<S>,
}

impl<S: LikeStore> LikeLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Return the identity row for `token`, creating it on first like
    pub fn ensure_identity(&self, token: &IdentityToken) -> Result<IdentityRecord, StorageError> {
        self.store.upsert_identity(token.as_str())
    }

    /// Record a like unless this identity already liked the stock
    pub fn record_like_if_absent(
        &self,
        identity: IdentityId,
        stock: StockId,
    ) -> Result<LikeOutcome, StorageError> {
        let inserted = self.store.insert_like(stock, identity)?;
        Ok(LikeOutcome { inserted })
    }

    pub fn count_likes(&self, stock: StockId) -> Result<u64, StorageError> {
        self.store.count_likes(stock)
    }
}

impl<S> Clone for LikeLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Signed like difference for a pair of stocks
///
/// Returns `(first - second, second - first)`. No floor at zero.
#[inline]
pub fn relative_likes(first: u64, second: u64) -> (i64, i64) {
    let diff = first as i64 - second as i64;
    (diff, -diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Symbol;
    use crate::core::StockRegistry;
    use crate::storage::MemoryStore;
    use crate::test_utils::test_hasher;
    use proptest::prelude::*;

    fn setup() -> (StockRegistry<MemoryStore>, LikeLedger<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (StockRegistry::new(store.clone()), LikeLedger::new(store))
    }

    #[test]
    fn test_repeat_like_is_ignored() {
        let (registry, ledger) = setup();
        let stock = registry.ensure_stock(&Symbol::parse("AAPL").unwrap()).unwrap();
        let token = test_hasher().derive("198.51.100.4").unwrap();
        let identity = ledger.ensure_identity(&token).unwrap();

        let first = ledger.record_like_if_absent(identity.id, stock.id).unwrap();
        let second = ledger.record_like_if_absent(identity.id, stock.id).unwrap();

        assert!(first.inserted);
        assert!(!second.inserted);
        assert_eq!(ledger.count_likes(stock.id).unwrap(), 1);
    }

    #[test]
    fn test_new_identity_adds_exactly_one() {
        let (registry, ledger) = setup();
        let hasher = test_hasher();
        let stock = registry.ensure_stock(&Symbol::parse("GOOG").unwrap()).unwrap();

        for (n, addr) in ["10.0.0.1", "10.0.0.2", "10.0.0.3"].iter().enumerate() {
            let before = ledger.count_likes(stock.id).unwrap();
            let identity = ledger.ensure_identity(&hasher.derive(addr).unwrap()).unwrap();
            ledger.record_like_if_absent(identity.id, stock.id).unwrap();
            assert_eq!(ledger.count_likes(stock.id).unwrap(), before + 1);
            assert_eq!(before, n as u64);
        }
    }

    #[test]
    fn test_same_token_same_identity() {
        let (_, ledger) = setup();
        let token = test_hasher().derive("::1").unwrap();
        let a = ledger.ensure_identity(&token).unwrap();
        let b = ledger.ensure_identity(&token).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.token, token.as_str());
    }

    #[test]
    fn test_relative_likes() {
        assert_eq!(relative_likes(0, 0), (0, 0));
        assert_eq!(relative_likes(5, 2), (3, -3));
        assert_eq!(relative_likes(1, 4), (-3, 3));
    }

    proptest! {
        #[test]
        fn prop_relative_likes_symmetric(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (first, second) = relative_likes(a, b);
            prop_assert_eq!(first, -second);
            prop_assert_eq!(first, a as i64 - b as i64);
        }
    }
}
