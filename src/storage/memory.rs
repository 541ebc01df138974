//! In-process store
//!
//! Rows live in append-only arenas; a hash index per table enforces the same
//! uniqueness constraints as the SQL schema. A single lock guards all tables,
//! so each trait method is atomic.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use super::{
    IdentityId, IdentityRecord, LikeStore, StockId, StockRecord, StorageError, StoreCounts,
};

#[derive(Default)]
struct Tables {
    stocks: Vec<String>,
    stock_index: HashMap<String, StockId>,
    identities: Vec<String>,
    identity_index: HashMap<String, IdentityId>,
    likes: HashSet<(StockId, IdentityId)>,
    likes_per_stock: HashMap<StockId, u64>,
}

impl Tables {
    // Ids start at 1 like SQLite rowids.
    fn stock_exists(&self, id: StockId) -> bool {
        id.as_raw() >= 1 && (id.as_raw() as usize) <= self.stocks.len()
    }

    fn identity_exists(&self, id: IdentityId) -> bool {
        id.as_raw() >= 1 && (id.as_raw() as usize) <= self.identities.len()
    }
}

/// Arena-backed LikeStore
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeStore for MemoryStore {
    fn upsert_stock(&self, symbol: &str) -> Result<StockRecord, StorageError> {
        let mut tables = self.tables.lock();
        if let Some(&id) = tables.stock_index.get(symbol) {
            return Ok(StockRecord {
                id,
                symbol: symbol.to_string(),
            });
        }

        tables.stocks.push(symbol.to_string());
        let id = StockId::from_raw(tables.stocks.len() as i64);
        tables.stock_index.insert(symbol.to_string(), id);
        crate::log_storage!(tracing::Level::INFO, symbol, "Created stock record");

        Ok(StockRecord {
            id,
            symbol: symbol.to_string(),
        })
    }

    fn find_stock(&self, symbol: &str) -> Result<Option<StockRecord>, StorageError> {
        let tables = self.tables.lock();
        Ok(tables.stock_index.get(symbol).map(|&id| StockRecord {
            id,
            symbol: symbol.to_string(),
        }))
    }

    fn upsert_identity(&self, token: &str) -> Result<IdentityRecord, StorageError> {
        let mut tables = self.tables.lock();
        let id = match tables.identity_index.get(token) {
            Some(&id) => id,
            None => {
                tables.identities.push(token.to_string());
                let id = IdentityId::from_raw(tables.identities.len() as i64);
                tables.identity_index.insert(token.to_string(), id);
                id
            }
        };

        Ok(IdentityRecord {
            id,
            token: token.to_string(),
        })
    }

    fn insert_like(&self, stock: StockId, identity: IdentityId) -> Result<bool, StorageError> {
        let mut tables = self.tables.lock();
        if !tables.stock_exists(stock) {
            return Err(StorageError::MissingReference {
                kind: "stock",
                id: stock.as_raw(),
            });
        }
        if !tables.identity_exists(identity) {
            return Err(StorageError::MissingReference {
                kind: "identity",
                id: identity.as_raw(),
            });
        }

        if !tables.likes.insert((stock, identity)) {
            return Ok(false);
        }
        *tables.likes_per_stock.entry(stock).or_insert(0) += 1;
        Ok(true)
    }

    fn count_likes(&self, stock: StockId) -> Result<u64, StorageError> {
        let tables = self.tables.lock();
        Ok(tables.likes_per_stock.get(&stock).copied().unwrap_or(0))
    }

    fn counts(&self) -> Result<StoreCounts, StorageError> {
        let tables = self.tables.lock();
        Ok(StoreCounts {
            stocks: tables.stocks.len() as u64,
            identities: tables.identities.len() as u64,
            likes: tables.likes.len() as u64,
        })
    }
}
