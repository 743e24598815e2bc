//! Polymarket integration for Whale Watcher
//!
//! This crate provides a client for the public Polymarket endpoints the
//! dashboard reads from: the Gamma search/markets API and the data API
//! activity feed. No authentication is required for any of them.

pub mod client;
pub mod types;

pub use client::PolymarketClient;
pub use types::{ActivityItem, ConditionMarket, GammaMarket, MarketCandidate};
