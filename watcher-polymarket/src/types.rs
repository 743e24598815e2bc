//! Polymarket API response types
//!
//! These types mirror the Gamma API and public data API responses and are
//! converted to watcher-core types for use in the dashboard.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use watcher_core::{Trade, TradeSide};

/// Base URL for the public data API (no auth required)
pub const DATA_API_BASE: &str = "https://data-api.polymarket.com";

// ============================================================================
// Search (Gamma /public-search)
// ============================================================================

/// Response from GET /public-search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub events: Vec<SearchEvent>,
}

/// An event from the search endpoint, with its nested markets
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<SearchMarket>,
}

/// A market nested inside a search event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMarket {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A resolved market candidate, flattened out of the search response
///
/// Candidates keep the upstream relevance order; the resolver never
/// re-sorts them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCandidate {
    /// Gamma market id
    pub id: String,
    /// Condition id, used to filter the activity feed
    pub condition_id: String,
    /// Market question text
    pub question: String,
    /// Market URL slug
    pub slug: String,
    /// Title of the parent event
    pub event_title: String,
}

impl SearchResponse {
    /// Flatten all markets across all matched events into one ordered list
    pub fn into_candidates(self) -> Vec<MarketCandidate> {
        let mut candidates = Vec::new();
        for event in self.events {
            let event_title = event.title.unwrap_or_default();
            for market in event.markets {
                candidates.push(MarketCandidate {
                    id: market.id.unwrap_or_default(),
                    condition_id: market.condition_id.unwrap_or_default(),
                    question: market.question.unwrap_or_default(),
                    slug: market.slug.unwrap_or_default(),
                    event_title: event_title.clone(),
                });
            }
        }
        candidates
    }
}

// ============================================================================
// Activity feed (data API /activity)
// ============================================================================

/// The activity endpoint answers with several envelope shapes depending on
/// deployment. Decoding tries each known shape in priority order; the first
/// that matches wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActivityResponse {
    Plain(Vec<ActivityItem>),
    Activity { activity: Vec<ActivityItem> },
    Data { data: Vec<ActivityItem> },
    Items { items: Vec<ActivityItem> },
    Result { result: Vec<ActivityItem> },
}

impl ActivityResponse {
    /// Unwrap whichever envelope matched
    pub fn into_items(self) -> Vec<ActivityItem> {
        match self {
            ActivityResponse::Plain(items) => items,
            ActivityResponse::Activity { activity } => activity,
            ActivityResponse::Data { data } => data,
            ActivityResponse::Items { items } => items,
            ActivityResponse::Result { result } => result,
        }
    }
}

/// A raw activity record for a wallet
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    /// Upstream record id
    #[serde(default)]
    pub id: Option<String>,
    /// Unix timestamp in epoch seconds
    #[serde(default)]
    pub timestamp: i64,
    /// Side string of arbitrary case ("buy", "SELL", ...)
    #[serde(default)]
    pub side: Option<String>,
    /// Shares traded
    #[serde(default)]
    pub size: Option<f64>,
    /// Price per share
    #[serde(default)]
    pub price: Option<f64>,
    /// Explicit USD notional, preferred over size * price when positive
    #[serde(default)]
    pub usdc_size: Option<f64>,
    /// Outcome label (Yes/No)
    #[serde(default)]
    pub outcome: Option<String>,
    /// On-chain transaction hash
    #[serde(default)]
    pub transaction_hash: Option<String>,
    /// Condition id of the market the record belongs to
    #[serde(default)]
    pub condition_id: Option<String>,
    /// Some responses carry the condition id under "market" instead
    #[serde(default)]
    pub market: Option<String>,
    /// Market title fields, present on some record shapes
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub market_title: Option<String>,
    #[serde(default)]
    pub market_question: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    /// Wallet profile fields, present on some record shapes
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pseudonym: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl ActivityItem {
    /// The condition id this record belongs to, whichever field carries it
    pub fn market_key(&self) -> Option<&str> {
        self.condition_id.as_deref().or(self.market.as_deref())
    }

    /// Best available market title carried on the record itself
    pub fn market_label(&self) -> Option<&str> {
        self.market_title
            .as_deref()
            .or(self.market_question.as_deref())
            .or(self.title.as_deref())
            .or(self.question.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Convert a raw activity record into a canonical trade.
    ///
    /// The same rule set applies to any source producing this raw shape:
    /// side uppercased and collapsed to BUY/SELL, numerics defaulting to
    /// zero, the explicit USDC notional winning over size * price when
    /// positive, and a random id when the record carries none.
    pub fn to_trade(&self, market_question: &str) -> Trade {
        let size = self.size.map(decimal_from_f64).unwrap_or(Decimal::ZERO);
        let price = self.price.map(decimal_from_f64).unwrap_or(Decimal::ZERO);
        let usdc_size = self.usdc_size.map(decimal_from_f64);

        Trade {
            id: self
                .transaction_hash
                .clone()
                .filter(|h| !h.is_empty())
                .or_else(|| self.id.clone().filter(|i| !i.is_empty()))
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            timestamp: Utc
                .timestamp_opt(self.timestamp, 0)
                .single()
                .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap()),
            market: market_question.to_string(),
            side: TradeSide::from_raw(self.side.as_deref()),
            size,
            price,
            total: Trade::resolve_total(size, price, usdc_size),
            outcome: self
                .outcome
                .clone()
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Convert an f64 wire value to Decimal, zero when it does not round-trip
fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_str(&value.to_string()).unwrap_or(Decimal::ZERO)
}

// ============================================================================
// Markets by condition id (Gamma /markets?condition_id=...)
// ============================================================================

/// A market looked up by condition id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionMarket {
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub market_title: Option<String>,
}

impl ConditionMarket {
    /// Display title, whichever field the response used
    pub fn display_title(&self) -> Option<&str> {
        self.question
            .as_deref()
            .or(self.title.as_deref())
            .or(self.market_title.as_deref())
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Market listing (Gamma /markets?active=true&closed=false)
// ============================================================================

/// A market from the Gamma listing endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(default)]
    pub id: Option<String>,

    /// Market question
    #[serde(default)]
    pub question: String,

    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,

    /// Outcome prices as a JSON-encoded string (e.g. "[\"0.65\", \"0.35\"]")
    #[serde(default)]
    pub outcome_prices: Option<String>,

    /// Outcome labels as a JSON-encoded string (e.g. "[\"Yes\", \"No\"]")
    #[serde(default)]
    pub outcomes: Option<String>,

    /// Whether the market is active
    #[serde(default)]
    pub active: Option<bool>,

    /// Whether the market is closed
    #[serde(default)]
    pub closed: Option<bool>,

    /// 24-hour volume
    #[serde(default, rename = "volume24hr")]
    pub volume_24hr: Option<f64>,

    /// Events this market belongs to (contains event slugs)
    #[serde(default)]
    pub events: Option<Vec<EventRef>>,
}

/// Event reference within a market
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRef {
    #[serde(default)]
    pub slug: Option<String>,
}

impl GammaMarket {
    /// Parse the YES and NO prices out of the JSON-encoded price and label
    /// arrays.
    ///
    /// Prices must parse as numbers with at least two entries or the market
    /// is unusable (None). Labels are best effort: YES and NO are located by
    /// case-insensitive name match, falling back to indices 0 and 1 when the
    /// labels are absent or unmatched.
    pub fn parse_outcome_prices(&self) -> Option<(Decimal, Decimal)> {
        let prices = parse_price_array(self.outcome_prices.as_deref()?)?;
        if prices.len() < 2 {
            return None;
        }

        let labels: Vec<String> = self
            .outcomes
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        let yes_index = labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case("yes"))
            .unwrap_or(0);
        let no_index = labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case("no"))
            .unwrap_or(1);

        let yes = *prices.get(yes_index)?;
        let no = *prices.get(no_index)?;
        Some((yes, no))
    }

    /// Parse 24h volume to Decimal
    pub fn parse_volume_24hr(&self) -> Decimal {
        self.volume_24hr
            .map(decimal_from_f64)
            .unwrap_or(Decimal::ZERO)
    }

    /// Slug for the canonical market URL: the parent event's slug when
    /// available, else the market's own
    pub fn canonical_slug(&self) -> Option<&str> {
        self.events
            .as_ref()
            .and_then(|events| events.first())
            .and_then(|event| event.slug.as_deref())
            .or(self.slug.as_deref())
    }

    /// Canonical URL of the market on polymarket.com
    pub fn market_url(&self) -> String {
        format!(
            "https://polymarket.com/event/{}",
            self.canonical_slug().unwrap_or_default()
        )
    }
}

/// Parse a JSON-encoded price array. The API transports prices as an array
/// of number-strings, occasionally as plain numbers.
fn parse_price_array(raw: &str) -> Option<Vec<Decimal>> {
    if let Ok(strings) = serde_json::from_str::<Vec<String>>(raw) {
        return strings
            .iter()
            .map(|s| Decimal::from_str(s.trim()).ok())
            .collect();
    }

    if let Ok(numbers) = serde_json::from_str::<Vec<f64>>(raw) {
        return numbers
            .iter()
            .map(|n| Decimal::from_str(&n.to_string()).ok())
            .collect();
    }

    None
}
