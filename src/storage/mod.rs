//! Persistence for stocks, identities and likes
//!
//! Every write is an atomic insert-or-ignore against a uniqueness constraint,
//! so concurrent requests racing on the same symbol, token or like pair
//! converge on a single row instead of failing.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::Serialize;

/// Opaque stock row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StockId(i64);

impl StockId {
    #[inline(always)]
    pub const fn from_raw(id: i64) -> Self {
        Self(id)
    }
    #[inline(always)]
    pub const fn as_raw(&self) -> i64 {
        self.0
    }
}

/// Opaque identity row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct IdentityId(i64);

impl IdentityId {
    #[inline(always)]
    pub const fn from_raw(id: i64) -> Self {
        Self(id)
    }
    #[inline(always)]
    pub const fn as_raw(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    pub id: StockId,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: IdentityId,
    pub token: String,
}

/// Row totals, used by diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub stocks: u64,
    pub identities: u64,
    pub likes: u64,
}

/// Storage backend for the stock registry and like ledger
///
/// Implementations must make each method atomic on its own; callers never
/// hold a transaction across methods.
pub trait LikeStore: Send + Sync {
    /// Insert the symbol unless present, then return the stored row
    fn upsert_stock(&self, symbol: &str) -> Result<StockRecord, StorageError>;

    /// Look up a stock without creating it
    fn find_stock(&self, symbol: &str) -> Result<Option<StockRecord>, StorageError>;

    /// Insert the identity token unless present, then return the stored row
    fn upsert_identity(&self, token: &str) -> Result<IdentityRecord, StorageError>;

    /// Insert a like for the pair unless present
    ///
    /// Returns `true` only when a new row was written.
    fn insert_like(&self, stock: StockId, identity: IdentityId) -> Result<bool, StorageError>;

    /// Number of likes referencing the stock
    fn count_likes(&self, stock: StockId) -> Result<u64, StorageError>;

    /// Row totals across all tables
    fn counts(&self) -> Result<StoreCounts, StorageError>;
}

impl<T: LikeStore + ?Sized> LikeStore for std::sync::Arc<T> {
    fn upsert_stock(&self, symbol: &str) -> Result<StockRecord, StorageError> {
        (**self).upsert_stock(symbol)
    }

    fn find_stock(&self, symbol: &str) -> Result<Option<StockRecord>, StorageError> {
        (**self).find_stock(symbol)
    }

    fn upsert_identity(&self, token: &str) -> Result<IdentityRecord, StorageError> {
        (**self).upsert_identity(token)
    }

    fn insert_like(&self, stock: StockId, identity: IdentityId) -> Result<bool, StorageError> {
        (**self).insert_like(stock, identity)
    }

    fn count_likes(&self, stock: StockId) -> Result<u64, StorageError> {
        (**self).count_likes(stock)
    }

    fn counts(&self) -> Result<StoreCounts, StorageError> {
        (**self).counts()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("unknown {kind} id {id}")]
    MissingReference { kind: &'static str, id: i64 },
}
