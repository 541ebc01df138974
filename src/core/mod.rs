//! Core like-deduplication types
//!
//! - IdentityHasher: caller address to anonymous token
//! - Symbol: validated ticker
//! - StockRegistry: one record per symbol
//! - LikeLedger: one like per (identity, stock), counts and relative likes

pub mod identity;
pub mod ledger;
pub mod registry;
pub mod symbol;

pub use identity::{IdentityHasher, IdentityParams, IdentityToken};
pub use ledger::{relative_likes, LikeLedger, LikeOutcome};
pub use registry::StockRegistry;
pub use symbol::{Symbol, SymbolError};
