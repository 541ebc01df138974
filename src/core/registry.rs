//! Stock registry
//!
//! One persistent record per symbol, created on first reference.

use crate::core::Symbol;
use crate::storage::{LikeStore, StockRecord, StorageError};
use std::sync::Arc;

pub struct StockRegistry<S> {
    store: Arc<S>,
}

impl<S: LikeStore> StockRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Return the record for `symbol`, creating it on first use
    ///
    /// Idempotent: repeated and concurrent calls yield the same id.
    pub fn ensure_stock(&self, symbol: &Symbol) -> Result<StockRecord, StorageError> {
        self.store.upsert_stock(symbol.as_str())
    }

    /// Look up a symbol without registering it
    pub fn find(&self, symbol: &Symbol) -> Result<Option<StockRecord>, StorageError> {
        self.store.find_stock(symbol.as_str())
    }
}

impl<S> Clone for StockRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
