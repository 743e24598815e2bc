//! Wallet trade orchestration
//!
//! The resolver → fetcher → normalizer pipeline, plus the connection probes
//! and wallet profile discovery built on the same client calls. Components
//! here degrade to empty results on upstream failure; the single exception
//! is `fetch_wallet_trades`, which propagates so the dashboard can tell
//! "no trades" from "fetch broke".

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use watcher_core::{Trade, WatcherResult};
use watcher_polymarket::{ActivityItem, MarketCandidate, PolymarketClient};

/// How many of a wallet's markets get resolved to authoritative titles
const PROFILE_MARKET_LIMIT: usize = 10;

/// A market a wallet has been active in
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMarket {
    /// Condition id
    pub id: String,
    /// Display title
    pub title: String,
}

/// Profile information gleaned from a wallet's activity feed
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletProfile {
    /// Markets the wallet has touched, in encounter order
    pub markets: Vec<WalletMarket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Service for fetching and normalizing a wallet's trades
pub struct TradeService {
    polymarket: Arc<PolymarketClient>,
}

impl TradeService {
    /// Create a new trade service
    pub fn new(polymarket: PolymarketClient) -> Self {
        Self {
            polymarket: Arc::new(polymarket),
        }
    }

    /// Resolve a free-text market query to candidate markets.
    ///
    /// Failures degrade to an empty list; callers treat empty as
    /// "not found", never as an error.
    #[instrument(skip(self))]
    pub async fn resolve_markets(&self, query: &str) -> Vec<MarketCandidate> {
        match self.polymarket.search_markets(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Market search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch raw activity records, degrading to empty on failure
    #[instrument(skip(self))]
    pub async fn fetch_activity(
        &self,
        wallet: &str,
        condition_id: Option<&str>,
    ) -> Vec<ActivityItem> {
        match self.polymarket.get_activity(wallet, condition_id, None).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Activity fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch a wallet's trades on the market best matching a query.
    ///
    /// An unmatched query is `Ok(empty)`. A failing activity fetch is an
    /// error: this is the one path that propagates upstream failure.
    #[instrument(skip(self))]
    pub async fn fetch_wallet_trades(
        &self,
        wallet: &str,
        market_query: &str,
    ) -> WatcherResult<Vec<Trade>> {
        let candidates = self.resolve_markets(market_query).await;

        // Take the first (most relevant) match; letting the user pick from
        // multiple candidates is a frontend concern.
        let Some(target) = candidates.first() else {
            warn!("No markets found for query: {}", market_query);
            return Ok(Vec::new());
        };

        let activity = self
            .polymarket
            .get_activity(wallet, Some(&target.condition_id), None)
            .await?;

        debug!(
            "Normalizing {} activity records for market: {}",
            activity.len(),
            target.question
        );

        Ok(activity
            .iter()
            .map(|item| item.to_trade(&target.question))
            .collect())
    }

    /// True when the query resolves to at least one market
    pub async fn test_market_connection(&self, query: &str) -> bool {
        !self.resolve_markets(query).await.is_empty()
    }

    /// True when the activity endpoint answered at all; a wallet with zero
    /// activity still passes
    pub async fn test_wallet_connection(&self, wallet: &str) -> bool {
        self.polymarket.get_activity(wallet, None, None).await.is_ok()
    }

    /// Discover which markets a wallet has been active in, along with any
    /// profile fields its activity records carry.
    ///
    /// Condition ids keep encounter order. The first few ids are resolved
    /// to authoritative questions via the markets endpoint; a miss there
    /// falls back to titles gleaned from the activity itself.
    #[instrument(skip(self))]
    pub async fn fetch_wallet_profile(&self, wallet: &str) -> WalletProfile {
        let activity = self.fetch_activity(wallet, None).await;

        let mut titles: IndexMap<String, String> = IndexMap::new();
        let mut username: Option<String> = None;
        let mut profile_image: Option<String> = None;

        for item in &activity {
            if let Some(key) = item.market_key() {
                let entry = titles.entry(key.to_string()).or_default();
                if entry.is_empty() {
                    if let Some(label) = item.market_label() {
                        *entry = label.to_string();
                    }
                }
            }
            if username.is_none() {
                username = item
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .or_else(|| item.pseudonym.clone().filter(|p| !p.is_empty()));
            }
            if profile_image.is_none() {
                profile_image = item.profile_image.clone().filter(|p| !p.is_empty());
            }
        }

        let ids: Vec<String> = titles.keys().take(PROFILE_MARKET_LIMIT).cloned().collect();
        if ids.is_empty() {
            return WalletProfile {
                markets: Vec::new(),
                username,
                profile_image,
            };
        }

        let mut markets: Vec<WalletMarket> =
            match self.polymarket.get_markets_by_condition(&ids).await {
                Ok(found) => found
                    .into_iter()
                    .filter_map(|m| {
                        let id = m.condition_id.clone()?;
                        let title = m
                            .display_title()
                            .unwrap_or("Unknown Market")
                            .to_string();
                        Some(WalletMarket { id, title })
                    })
                    .collect(),
                Err(e) => {
                    warn!("Failed to fetch market details: {}", e);
                    Vec::new()
                }
            };

        if markets.is_empty() {
            // Endpoint failed or returned nothing usable: fall back to
            // activity-derived names
            markets = ids
                .iter()
                .map(|id| WalletMarket {
                    id: id.clone(),
                    title: fallback_title(&titles, id),
                })
                .collect();
        } else {
            // Back-fill ids the endpoint did not cover
            for id in &ids {
                if !markets.iter().any(|m| &m.id == id) {
                    markets.push(WalletMarket {
                        id: id.clone(),
                        title: fallback_title(&titles, id),
                    });
                }
            }
        }

        WalletProfile {
            markets,
            username,
            profile_image,
        }
    }
}

/// Activity-derived title for a condition id, "Unknown Market" as a last
/// resort
fn fallback_title(titles: &IndexMap<String, String>, id: &str) -> String {
    titles
        .get(id)
        .filter(|t| !t.is_empty())
        .cloned()
        .unwrap_or_else(|| "Unknown Market".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nothing listens on discard ports, so every request fails fast with
    /// a connection error
    fn unreachable_service() -> TradeService {
        TradeService::new(PolymarketClient::with_base_urls(
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
        ))
    }

    #[tokio::test]
    async fn test_resolver_degrades_to_empty_on_network_failure() {
        let service = unreachable_service();
        assert!(service.resolve_markets("election").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetcher_degrades_to_empty_on_network_failure() {
        let service = unreachable_service();
        assert!(service.fetch_activity("0xabc", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_probes_fail_cleanly() {
        let service = unreachable_service();
        assert!(!service.test_market_connection("election").await);
        assert!(!service.test_wallet_connection("0xabc").await);
    }

    #[tokio::test]
    async fn test_wallet_trades_are_empty_when_market_unmatched() {
        // Resolution degrades to no candidates, which is Ok(empty), not an
        // error
        let service = unreachable_service();
        let trades = service
            .fetch_wallet_trades("0xabc", "election")
            .await
            .unwrap();
        assert!(trades.is_empty());
    }

    #[tokio::test]
    async fn test_wallet_profile_degrades_to_empty() {
        let service = unreachable_service();
        let profile = service.fetch_wallet_profile("0xabc").await;
        assert!(profile.markets.is_empty());
        assert!(profile.username.is_none());
    }
}
