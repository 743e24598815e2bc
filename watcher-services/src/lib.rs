//! Business logic services for Whale Watcher
//!
//! This crate provides the service layer between the Polymarket client and
//! the HTTP API: wallet trade orchestration, CSV import, arbitrage
//! scanning, and the strategy-analysis adapter.

pub mod analysis;
pub mod arbitrage;
pub mod csv;
pub mod trades;

pub use analysis::{AnalysisConfig, AnalysisProvider, StrategyAnalyzer};
pub use arbitrage::{default_threshold, ArbitrageScanner};
pub use csv::parse_csv;
pub use trades::{TradeService, WalletMarket, WalletProfile};
