//! Polymarket API client
//!
//! Provides methods for the public endpoints the dashboard reads from:
//! market search, the wallet activity feed, condition-id lookups, and the
//! active-market listing used by the arbitrage scan.

use crate::types::{
    ActivityItem, ActivityResponse, ConditionMarket, GammaMarket, MarketCandidate,
    SearchResponse, DATA_API_BASE,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use watcher_core::{WatcherError, WatcherResult};

/// Base URL for the Polymarket Gamma API
const GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

/// Default number of activity records per fetch (most recent first)
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 50;

/// Polymarket API client
#[derive(Clone)]
pub struct PolymarketClient {
    client: Client,
    gamma_url: String,
    data_api_url: String,
}

impl PolymarketClient {
    /// Create a new Polymarket client
    pub fn new() -> Self {
        Self::with_base_urls(GAMMA_API_BASE, DATA_API_BASE)
    }

    /// Create a client against explicit base URLs (tests, proxies)
    pub fn with_base_urls(gamma_url: impl Into<String>, data_api_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            gamma_url: gamma_url.into(),
            data_api_url: data_api_url.into(),
        }
    }

    /// Get the Gamma base URL
    pub fn gamma_url(&self) -> &str {
        &self.gamma_url
    }

    /// Search markets by free-text query
    ///
    /// Flattens all markets across all matched events into one list in
    /// upstream relevance order.
    #[instrument(skip(self))]
    pub async fn search_markets(&self, query: &str) -> WatcherResult<Vec<MarketCandidate>> {
        let url = format!("{}/public-search", self.gamma_url);

        debug!("Searching Polymarket markets: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| WatcherError::network(format!("Failed to search markets: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::api(format!(
                "Polymarket API error ({}): {}",
                status, body
            )));
        }

        let search: SearchResponse = response.json().await.map_err(|e| {
            WatcherError::parse(format!("Failed to parse search response: {}", e))
        })?;

        Ok(search.into_candidates())
    }

    /// Fetch a wallet's raw activity records, most recent first
    ///
    /// # Arguments
    /// * `wallet` - The wallet address
    /// * `condition_id` - Optional condition id to filter to one market
    /// * `limit` - Maximum records to return (default 50)
    #[instrument(skip(self))]
    pub async fn get_activity(
        &self,
        wallet: &str,
        condition_id: Option<&str>,
        limit: Option<u32>,
    ) -> WatcherResult<Vec<ActivityItem>> {
        let url = format!("{}/activity", self.data_api_url);
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).to_string();

        let mut params = vec![
            ("limit", limit.as_str()),
            ("sortBy", "TIMESTAMP"),
            ("sortDirection", "DESC"),
            ("user", wallet),
        ];
        if let Some(condition_id) = condition_id {
            params.push(("market", condition_id));
        }

        debug!("Fetching Polymarket activity for wallet: {}", wallet);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WatcherError::network(format!("Failed to fetch activity: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::api(format!(
                "Data API error ({}): {}",
                status, body
            )));
        }

        // The endpoint answers with one of several envelope shapes; the
        // untagged decode tries them in priority order.
        let activity: ActivityResponse = response.json().await.map_err(|e| {
            WatcherError::parse(format!("Failed to parse activity response: {}", e))
        })?;

        Ok(activity.into_items())
    }

    /// Look up markets by condition id (comma-joined batch)
    #[instrument(skip(self, condition_ids))]
    pub async fn get_markets_by_condition(
        &self,
        condition_ids: &[String],
    ) -> WatcherResult<Vec<ConditionMarket>> {
        let url = format!(
            "{}/markets?condition_id={}",
            self.gamma_url,
            condition_ids.join(",")
        );

        debug!("Fetching markets for {} condition ids", condition_ids.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WatcherError::network(format!("Failed to fetch markets: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::api(format!(
                "Polymarket API error ({}): {}",
                status, body
            )));
        }

        let markets: Vec<ConditionMarket> = response.json().await.map_err(|e| {
            WatcherError::parse(format!("Failed to parse markets response: {}", e))
        })?;

        Ok(markets)
    }

    /// List open markets for the arbitrage scan
    ///
    /// Only active, non-closed markets are requested; the caller still
    /// re-checks the flags since the listing can lag.
    #[instrument(skip(self))]
    pub async fn list_active_markets(&self, limit: u32) -> WatcherResult<Vec<GammaMarket>> {
        let url = format!(
            "{}/markets?active=true&closed=false&limit={}",
            self.gamma_url, limit
        );

        debug!("Fetching active Polymarket markets from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WatcherError::network(format!("Failed to fetch markets: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::api(format!(
                "Polymarket API error ({}): {}",
                status, body
            )));
        }

        let markets: Vec<GammaMarket> = response.json().await.map_err(|e| {
            WatcherError::parse(format!("Failed to parse markets response: {}", e))
        })?;

        Ok(markets)
    }
}

impl Default for PolymarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PolymarketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolymarketClient")
            .field("gamma_url", &self.gamma_url)
            .finish()
    }
}
