//! Stock price checker service
//!
//! # Architecture
//! - **core**: Identity hashing, symbols, stock registry, like ledger
//! - **storage**: SQLite and in-memory stores
//! - **quotes**: Quote proxy client
//! - **engine**: Per-request orchestration
//! - **infrastructure**: HTTP API, config, logging, metrics

use anyhow::Context;
use std::sync::Arc;

use stock_price_checker::core::IdentityHasher;
use stock_price_checker::infrastructure::{logging, start_server, Config, MetricsCollector};
use stock_price_checker::quotes::HttpQuoteClient;
use stock_price_checker::storage::SqliteStore;
use stock_price_checker::StockPriceService;

/// Main application
pub struct CheckerApp {
    /// Configuration (immutable after startup)
    config: Config,
}

impl CheckerApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Open storage, build the service and serve until shutdown
    pub async fn run(&self) -> anyhow::Result<()> {
        stock_price_checker::log_main!(tracing::Level::INFO, "Starting stock price checker...");

        // 1. Storage
        let store = SqliteStore::open(&self.config.storage.path).with_context(|| {
            format!("Failed to open database at {}", self.config.storage.path.display())
        })?;
        stock_price_checker::log_main!(
            tracing::Level::INFO,
            "Database ready at {}",
            self.config.storage.path.display()
        );

        // 2. Collaborators
        let quotes = HttpQuoteClient::new(&self.config.quotes).context("Failed to build quote client")?;
        let hasher = IdentityHasher::new(self.config.identity.params())
            .context("Invalid identity parameters")?;
        let metrics = Arc::new(MetricsCollector::new());

        // 3. Service + API
        let service = Arc::new(StockPriceService::new(Arc::new(store), quotes, hasher, metrics));
        start_server(service, &self.config.server)
            .await
            .context("API server failed")?;

        stock_price_checker::log_main!(tracing::Level::INFO, "Stock price checker stopped");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Guards flush buffered log lines on drop
    let _guards = logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    tracing::info!(?config, "Configuration loaded");

    CheckerApp::new(config).run().await
}
