//! Request orchestration
//!
//! Turns a parsed stock query into a response payload:
//! price lookup, stock records, optional like, then like counts.
//! Likes are always recorded before counts are read.

use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

use crate::core::{relative_likes, IdentityHasher, LikeLedger, StockRegistry, Symbol, SymbolError};
use crate::infrastructure::metrics::MetricsCollector;
use crate::quotes::QuoteSource;
use crate::storage::{LikeStore, StockRecord};
use crate::Result;

/// Symbols requested by one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockSelection {
    Single(Symbol),
    Pair(Symbol, Symbol),
}

/// Parsed `/api/stock-prices` query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQuery {
    pub selection: StockSelection,
    pub like: bool,
}

impl StockQuery {
    /// Build a query from raw key/value pairs
    ///
    /// `stock` may repeat (`stock=A&stock=B`) or hold a comma list
    /// (`stock=A,B`). Exactly one or two symbols are accepted.
    pub fn from_params(params: &[(String, String)]) -> std::result::Result<Self, QueryError> {
        let raw: Vec<&str> = params
            .iter()
            .filter(|(key, _)| key == "stock")
            .flat_map(|(_, value)| value.split(','))
            .collect();

        let like = params
            .iter()
            .any(|(key, value)| key == "like" && value.eq_ignore_ascii_case("true"));

        let selection = match raw.as_slice() {
            [one] => StockSelection::Single(Symbol::parse(one)?),
            [first, second] => StockSelection::Pair(Symbol::parse(first)?, Symbol::parse(second)?),
            other => return Err(QueryError::Cardinality(other.len())),
        };

        Ok(Self { selection, like })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("expected one or two stock symbols, got {0}")]
    Cardinality(usize),

    #[error("invalid stock symbol: {0}")]
    InvalidSymbol(#[from] SymbolError),
}

/// Single-stock payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLikes {
    pub stock: String,
    pub price: f64,
    pub likes: u64,
}

/// One side of a two-stock comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeStockLikes {
    pub stock: String,
    pub price: f64,
    pub rel_likes: i64,
}

/// Contents of `stockData`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StockData {
    Single(StockLikes),
    Pair([RelativeStockLikes; 2]),
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPriceResponse {
    pub stock_data: StockData,
}

/// Composes quotes, registry, ledger and identity hashing per request
pub struct StockPriceService<S, Q> {
    records: LikeRecords<S>,
    quotes: Q,
}

impl<S: LikeStore + 'static, Q: QuoteSource> StockPriceService<S, Q> {
    pub fn new(store: Arc<S>, quotes: Q, hasher: IdentityHasher, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            records: LikeRecords {
                registry: StockRegistry::new(store.clone()),
                ledger: LikeLedger::new(store),
                hasher,
                metrics,
            },
            quotes,
        }
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.records.metrics.clone()
    }

    pub fn registry(&self) -> &StockRegistry<S> {
        &self.records.registry
    }

    pub fn ledger(&self) -> &LikeLedger<S> {
        &self.records.ledger
    }

    /// Serve one parsed query for the caller at `caller`
    pub async fn handle(&self, query: StockQuery, caller: IpAddr) -> Result<StockData> {
        match query.selection {
            StockSelection::Single(symbol) => {
                self.records.metrics.record_single_request();
                self.single(symbol, query.like, caller).await
            }
            StockSelection::Pair(first, second) => {
                self.records.metrics.record_pair_request();
                self.pair(first, second, query.like, caller).await
            }
        }
    }

    async fn single(&self, symbol: Symbol, like: bool, caller: IpAddr) -> Result<StockData> {
        let price = self.quotes.latest_price(&symbol).await?;

        let records = self.records.clone();
        let (stock, likes) = tokio::task::spawn_blocking(move || -> Result<_> {
            let stock = records.registry.ensure_stock(&symbol)?;
            if like {
                records.like_all(std::slice::from_ref(&stock), caller)?;
            }
            let likes = records.ledger.count_likes(stock.id)?;
            Ok((stock, likes))
        })
        .await??;

        tracing::debug!(symbol = %stock.symbol, price, likes, "Single stock resolved");

        Ok(StockData::Single(StockLikes {
            stock: stock.symbol,
            price,
            likes,
        }))
    }

    async fn pair(&self, first: Symbol, second: Symbol, like: bool, caller: IpAddr) -> Result<StockData> {
        let (first_price, second_price) = tokio::try_join!(
            self.quotes.latest_price(&first),
            self.quotes.latest_price(&second)
        )?;

        let records = self.records.clone();
        let (stocks, first_likes, second_likes) = tokio::task::spawn_blocking(move || -> Result<_> {
            let stocks = [
                records.registry.ensure_stock(&first)?,
                records.registry.ensure_stock(&second)?,
            ];
            if like {
                records.like_all(&stocks, caller)?;
            }
            let first_likes = records.ledger.count_likes(stocks[0].id)?;
            let second_likes = records.ledger.count_likes(stocks[1].id)?;
            Ok((stocks, first_likes, second_likes))
        })
        .await??;

        let (first_rel, second_rel) = relative_likes(first_likes, second_likes);
        let [first_stock, second_stock] = stocks;

        tracing::debug!(
            first = %first_stock.symbol,
            second = %second_stock.symbol,
            first_likes,
            second_likes,
            "Stock pair resolved"
        );

        Ok(StockData::Pair([
            RelativeStockLikes {
                stock: first_stock.symbol,
                price: first_price,
                rel_likes: first_rel,
            },
            RelativeStockLikes {
                stock: second_stock.symbol,
                price: second_price,
                rel_likes: second_rel,
            },
        ]))
    }
}

/// Blocking half of a request: store access and identity hashing
///
/// Runs on the blocking pool so a slow disk or PBKDF2 never holds a runtime worker.
struct LikeRecords<S> {
    registry: StockRegistry<S>,
    ledger: LikeLedger<S>,
    hasher: IdentityHasher,
    metrics: Arc<MetricsCollector>,
}

impl<S> Clone for LikeRecords<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            ledger: self.ledger.clone(),
            hasher: self.hasher.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: LikeStore> LikeRecords<S> {
    /// Derive the caller identity once and like every stock for it
    ///
    /// IPv4-mapped IPv6 callers hash as their IPv4 address.
    fn like_all(&self, stocks: &[StockRecord], caller: IpAddr) -> Result<()> {
        let token = self.hasher.derive(&caller.to_canonical().to_string())?;
        let identity = self.ledger.ensure_identity(&token)?;

        for stock in stocks {
            let outcome = self.ledger.record_like_if_absent(identity.id, stock.id)?;
            if outcome.inserted {
                self.metrics.record_like();
                tracing::info!(symbol = %stock.symbol, "Like recorded");
            } else {
                self.metrics.record_duplicate_like();
                tracing::debug!(symbol = %stock.symbol, "Duplicate like ignored");
            }
        }
        Ok(())
    }
}
