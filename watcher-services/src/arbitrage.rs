//! Arbitrage scanner
//!
//! Scans open markets for books where buying both YES and NO costs less
//! than the guaranteed $1.00 payout. Results are rebuilt from a fresh
//! snapshot on every scan; nothing is cached between calls.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use watcher_core::ArbitrageOpportunity;
use watcher_polymarket::{GammaMarket, PolymarketClient};

/// Markets fetched per opportunity scan
const SCAN_MARKET_LIMIT: u32 = 200;

/// Markets fetched for the unfiltered price listing
const LISTING_MARKET_LIMIT: u32 = 100;

/// Default maximum combined cost to count as an opportunity (0.5% edge)
pub fn default_threshold() -> Decimal {
    Decimal::new(995, 3)
}

/// Combined costs at or below this are placeholder pricing, not real books
fn combined_floor() -> Decimal {
    Decimal::new(5, 1)
}

/// Scanner over the Gamma market listing
pub struct ArbitrageScanner {
    polymarket: Arc<PolymarketClient>,
}

impl ArbitrageScanner {
    /// Create a new scanner
    pub fn new(polymarket: PolymarketClient) -> Self {
        Self {
            polymarket: Arc::new(polymarket),
        }
    }

    /// Scan active markets for combined costs below `threshold`, ranked by
    /// profit potential.
    ///
    /// Degrades to an empty list on network or top-level decode failure;
    /// individually unparseable markets are skipped, never abort the scan.
    #[instrument(skip(self))]
    pub async fn scan_for_opportunities(&self, threshold: Decimal) -> Vec<ArbitrageOpportunity> {
        let markets = match self.polymarket.list_active_markets(SCAN_MARKET_LIMIT).await {
            Ok(markets) => markets,
            Err(e) => {
                warn!("Arbitrage scan failed to fetch markets: {}", e);
                return Vec::new();
            }
        };

        debug!(
            "Scanning {} markets for arbitrage (threshold: {})",
            markets.len(),
            threshold
        );

        let opportunities = rank_opportunities(&markets, threshold);

        debug!(
            "Found {} opportunities below threshold {}",
            opportunities.len(),
            threshold
        );

        opportunities
    }

    /// Every parseable, non-zero market with its current prices, sorted
    /// closest-to-arbitrage first (ascending combined cost). No threshold
    /// filter.
    #[instrument(skip(self))]
    pub async fn all_markets_with_prices(&self) -> Vec<ArbitrageOpportunity> {
        let markets = match self
            .polymarket
            .list_active_markets(LISTING_MARKET_LIMIT)
            .await
        {
            Ok(markets) => markets,
            Err(e) => {
                warn!("Market price listing failed: {}", e);
                return Vec::new();
            }
        };

        rank_markets_by_cost(&markets)
    }
}

/// Evaluate one market into an opportunity candidate.
///
/// Closed or inactive markets, unparseable price arrays, and books with
/// both prices at exactly zero (no liquidity) yield None.
fn evaluate(market: &GammaMarket) -> Option<ArbitrageOpportunity> {
    if market.closed.unwrap_or(false) || !market.active.unwrap_or(false) {
        return None;
    }

    let (yes_price, no_price) = market.parse_outcome_prices()?;

    if yes_price.is_zero() && no_price.is_zero() {
        return None;
    }

    let combined_cost = yes_price + no_price;

    Some(ArbitrageOpportunity {
        question: market.question.clone(),
        slug: market.slug.clone().unwrap_or_default(),
        yes_price,
        no_price,
        combined_cost,
        potential_profit: Decimal::ONE - combined_cost,
        market_url: market.market_url(),
        volume_24hr: market.parse_volume_24hr(),
    })
}

/// Opportunities under `threshold`, descending by potential profit.
///
/// The lower bound on combined cost rejects degenerate placeholder pricing;
/// a book costing under fifty cents is not a real opportunity.
fn rank_opportunities(markets: &[GammaMarket], threshold: Decimal) -> Vec<ArbitrageOpportunity> {
    let mut opportunities: Vec<ArbitrageOpportunity> = markets
        .iter()
        .filter_map(evaluate)
        .filter(|o| o.combined_cost < threshold && o.combined_cost > combined_floor())
        .collect();

    opportunities.sort_by(|a, b| b.potential_profit.cmp(&a.potential_profit));
    opportunities
}

/// All evaluated markets, ascending by combined cost
fn rank_markets_by_cost(markets: &[GammaMarket]) -> Vec<ArbitrageOpportunity> {
    let mut results: Vec<ArbitrageOpportunity> = markets.iter().filter_map(evaluate).collect();

    results.sort_by(|a, b| a.combined_cost.cmp(&b.combined_cost));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market(question: &str, prices: &str, outcomes: &str) -> GammaMarket {
        serde_json::from_str(&format!(
            r#"{{
                "question": "{}",
                "slug": "{}",
                "active": true,
                "closed": false,
                "outcomePrices": {},
                "outcomes": {},
                "volume24hr": 1234.5
            }}"#,
            question,
            question.to_lowercase().replace(' ', "-"),
            serde_json::to_string(prices).unwrap(),
            serde_json::to_string(outcomes).unwrap()
        ))
        .unwrap()
    }

    #[test]
    fn test_underpriced_market_is_an_opportunity() {
        let markets = vec![market("Q1", r#"["0.40", "0.55"]"#, r#"["Yes", "No"]"#)];
        let found = rank_opportunities(&markets, dec!(0.995));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].combined_cost, dec!(0.95));
        assert_eq!(found[0].potential_profit, dec!(0.05));
        assert_eq!(found[0].yes_price, dec!(0.40));
        assert_eq!(found[0].no_price, dec!(0.55));
    }

    #[test]
    fn test_zero_liquidity_market_is_excluded() {
        let markets = vec![market("Q1", r#"["0.0", "0.0"]"#, r#"["Yes", "No"]"#)];
        assert!(rank_opportunities(&markets, dec!(0.995)).is_empty());
        assert!(rank_markets_by_cost(&markets).is_empty());
    }

    #[test]
    fn test_combined_cost_below_floor_is_excluded() {
        // 0.3 is under the threshold but also under the 0.5 sanity floor
        let markets = vec![market("Q1", r#"["0.10", "0.20"]"#, r#"["Yes", "No"]"#)];
        assert!(rank_opportunities(&markets, dec!(0.995)).is_empty());
        // The unfiltered listing still carries it
        assert_eq!(rank_markets_by_cost(&markets).len(), 1);
    }

    #[test]
    fn test_fairly_priced_market_is_excluded() {
        let markets = vec![market("Q1", r#"["0.50", "0.50"]"#, r#"["Yes", "No"]"#)];
        assert!(rank_opportunities(&markets, dec!(0.995)).is_empty());
    }

    #[test]
    fn test_opportunities_ranked_by_profit_descending() {
        let markets = vec![
            market("Small edge", r#"["0.49", "0.49"]"#, r#"["Yes", "No"]"#),
            market("Big edge", r#"["0.40", "0.50"]"#, r#"["Yes", "No"]"#),
        ];
        let found = rank_opportunities(&markets, dec!(0.995));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].question, "Big edge");
        assert_eq!(found[1].question, "Small edge");
    }

    #[test]
    fn test_listing_ranked_by_combined_cost_ascending() {
        let markets = vec![
            market("Rich", r#"["0.60", "0.42"]"#, r#"["Yes", "No"]"#),
            market("Cheap", r#"["0.40", "0.50"]"#, r#"["Yes", "No"]"#),
        ];
        let listed = rank_markets_by_cost(&markets);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].question, "Cheap");
        assert_eq!(listed[1].question, "Rich");
    }

    #[test]
    fn test_unparseable_market_is_skipped_not_fatal() {
        let markets = vec![
            market("Broken", "nonsense", r#"["Yes", "No"]"#),
            market("Fine", r#"["0.45", "0.45"]"#, r#"["Yes", "No"]"#),
        ];
        let found = rank_opportunities(&markets, dec!(0.995));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Fine");
    }

    #[test]
    fn test_closed_or_inactive_market_is_skipped() {
        let mut closed = market("Closed", r#"["0.45", "0.45"]"#, r#"["Yes", "No"]"#);
        closed.closed = Some(true);
        let mut inactive = market("Inactive", r#"["0.45", "0.45"]"#, r#"["Yes", "No"]"#);
        inactive.active = Some(false);
        assert!(rank_opportunities(&[closed, inactive], dec!(0.995)).is_empty());
    }

    #[test]
    fn test_market_url_prefers_event_slug() {
        let gamma: GammaMarket = serde_json::from_str(
            r#"{
                "question": "Q",
                "slug": "market-slug",
                "active": true,
                "closed": false,
                "outcomePrices": "[\"0.45\", \"0.45\"]",
                "outcomes": "[\"Yes\", \"No\"]",
                "events": [{"slug": "event-slug"}]
            }"#,
        )
        .unwrap();
        let found = rank_opportunities(&[gamma], dec!(0.995));
        assert_eq!(
            found[0].market_url,
            "https://polymarket.com/event/event-slug"
        );
        assert_eq!(found[0].slug, "market-slug");
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(default_threshold(), dec!(0.995));
    }
}
