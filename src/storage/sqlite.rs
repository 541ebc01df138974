//! SQLite-backed store
//!
//! Schema:
//! - `stocks(id, symbol UNIQUE)`
//! - `ip(id, ip_hash UNIQUE)`
//! - `stock_ip_junction(id, stock_id, ip_id, UNIQUE(stock_id, ip_id))`

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{
    IdentityId, IdentityRecord, LikeStore, StockId, StockRecord, StorageError, StoreCounts,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stocks (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT    NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS ip (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    ip_hash TEXT    NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS stock_ip_junction (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id INTEGER NOT NULL REFERENCES stocks(id),
    ip_id    INTEGER NOT NULL REFERENCES ip(id),
    UNIQUE (stock_id, ip_id)
);
CREATE INDEX IF NOT EXISTS idx_junction_stock ON stock_ip_junction(stock_id);
";

/// Path value selecting a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// LikeStore implementation backed by rusqlite (bundled SQLite)
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database file and apply the schema
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if path.as_os_str() == IN_MEMORY {
            return Self::open_in_memory();
        }

        let conn = Connection::open(path).map_err(|e| StorageError::Connection(e.to_string()))?;

        // WAL keeps readers off the writer's back
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Self::with_connection(conn)
    }

    /// Create an in-memory database (useful for tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Connection(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StorageError::Execution(e.to_string()))?;

        crate::log_storage!(tracing::Level::DEBUG, "SQLite schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64, StorageError> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count: i64 = conn
        .query_row(&sql, [], |row| row.get(0))
        .map_err(|e| StorageError::Query(e.to_string()))?;
    Ok(count as u64)
}

impl LikeStore for SqliteStore {
    fn upsert_stock(&self, symbol: &str) -> Result<StockRecord, StorageError> {
        let conn = self.conn.lock();

        let inserted = conn
            .execute(
                "INSERT INTO stocks(symbol) VALUES (?1) ON CONFLICT(symbol) DO NOTHING",
                params![symbol],
            )
            .map_err(|e| StorageError::Execution(e.to_string()))?;
        if inserted > 0 {
            crate::log_storage!(tracing::Level::INFO, symbol, "Created stock record");
        }

        let id: i64 = conn
            .query_row(
                "SELECT id FROM stocks WHERE symbol = ?1",
                params![symbol],
                |row| row.get(0),
            )
            .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(StockRecord {
            id: StockId::from_raw(id),
            symbol: symbol.to_string(),
        })
    }

    fn find_stock(&self, symbol: &str) -> Result<Option<StockRecord>, StorageError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, symbol FROM stocks WHERE symbol = ?1",
            params![symbol],
            |row| {
                Ok(StockRecord {
                    id: StockId::from_raw(row.get(0)?),
                    symbol: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(|e| StorageError::Query(e.to_string()))
    }

    fn upsert_identity(&self, token: &str) -> Result<IdentityRecord, StorageError> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO ip(ip_hash) VALUES (?1) ON CONFLICT(ip_hash) DO NOTHING",
            params![token],
        )
        .map_err(|e| StorageError::Execution(e.to_string()))?;

        let id: i64 = conn
            .query_row(
                "SELECT id FROM ip WHERE ip_hash = ?1",
                params![token],
                |row| row.get(0),
            )
            .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(IdentityRecord {
            id: IdentityId::from_raw(id),
            token: token.to_string(),
        })
    }

    fn insert_like(&self, stock: StockId, identity: IdentityId) -> Result<bool, StorageError> {
        let conn = self.conn.lock();
        let affected = conn
            .execute(
                "INSERT INTO stock_ip_junction(stock_id, ip_id) VALUES (?1, ?2) \
                 ON CONFLICT(stock_id, ip_id) DO NOTHING",
                params![stock.as_raw(), identity.as_raw()],
            )
            .map_err(|e| StorageError::Execution(e.to_string()))?;
        Ok(affected > 0)
    }

    fn count_likes(&self, stock: StockId) -> Result<u64, StorageError> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM stock_ip_junction WHERE stock_id = ?1",
                params![stock.as_raw()],
                |row| row.get(0),
            )
            .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    fn counts(&self) -> Result<StoreCounts, StorageError> {
        let conn = self.conn.lock();
        Ok(StoreCounts {
            stocks: count_rows(&conn, "stocks")?,
            identities: count_rows(&conn, "ip")?,
            likes: count_rows(&conn, "stock_ip_junction")?,
        })
    }
}
