//! Infrastructure
//!
//! This module contains the service plumbing around the core:
//! - HTTP API
//! - Configuration management
//! - Logging and metrics

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;

pub use api::{create_router, start_server};
pub use config::{Config, ConfigError, LoggingConfig};
pub use metrics::MetricsCollector;
