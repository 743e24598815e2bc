//! Core types for Whale Watcher
//!
//! This crate defines the shared data structures used across the dashboard
//! backend: the canonical trade record, derived portfolio statistics, and
//! arbitrage scan results.

pub mod arbitrage;
pub mod error;
pub mod stats;
pub mod trade;

pub use arbitrage::ArbitrageOpportunity;
pub use error::{WatcherError, WatcherResult};
pub use stats::DashboardStats;
pub use trade::{Trade, TradeSide};
