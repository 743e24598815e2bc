//! Canonical trade record
//!
//! Every ingestion path (live activity feed, CSV export) produces this same
//! shape. A `Trade` is never mutated after construction; a refresh replaces
//! the whole collection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a trade after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Normalize a raw upstream side string.
    ///
    /// Upstream casing is arbitrary ("buy", "Sell", "SELL"). Anything that
    /// does not uppercase to exactly BUY or SELL collapses to Buy, so the
    /// output is always one of two values.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_uppercase()).as_deref() {
            Some("SELL") => TradeSide::Sell,
            _ => TradeSide::Buy,
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A single normalized trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Transaction hash, upstream record id, or a synthesized fallback.
    /// Unique within one result set.
    pub id: String,

    /// When the trade happened (serialized as ISO-8601)
    pub timestamp: DateTime<Utc>,

    /// Resolved market question text
    pub market: String,

    /// BUY or SELL, never a raw upstream value
    pub side: TradeSide,

    /// Shares traded
    pub size: Decimal,

    /// Price per share (0.00 - 1.00 expected, not enforced)
    pub price: Decimal,

    /// USD notional. The upstream USDC size when it was > 0,
    /// otherwise size * price.
    pub total: Decimal,

    /// Outcome label ("Yes"/"No"), "Unknown" when absent
    pub outcome: String,
}

impl Trade {
    /// Resolve the USD notional for a trade.
    ///
    /// The explicit USDC size wins when it carries a positive value; zero,
    /// negative, or absent falls back to size * price.
    pub fn resolve_total(size: Decimal, price: Decimal, usdc_size: Option<Decimal>) -> Decimal {
        match usdc_size {
            Some(usdc) if usdc > Decimal::ZERO => usdc,
            _ => size * price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// All 2^n casings of a word
    fn case_variants(word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        (0..1u32 << chars.len())
            .map(|mask| {
                chars
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        if mask & (1 << i) != 0 {
                            c.to_ascii_uppercase()
                        } else {
                            c.to_ascii_lowercase()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_side_normalization_is_total() {
        for variant in case_variants("buy") {
            assert_eq!(TradeSide::from_raw(Some(&variant)), TradeSide::Buy);
        }
        for variant in case_variants("sell") {
            assert_eq!(TradeSide::from_raw(Some(&variant)), TradeSide::Sell);
        }
        // Anything else, including absence, collapses to Buy
        assert_eq!(TradeSide::from_raw(Some("short")), TradeSide::Buy);
        assert_eq!(TradeSide::from_raw(Some("MERGE")), TradeSide::Buy);
        assert_eq!(TradeSide::from_raw(Some("")), TradeSide::Buy);
        assert_eq!(TradeSide::from_raw(None), TradeSide::Buy);
    }

    #[test]
    fn test_side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TradeSide::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&TradeSide::Sell).unwrap(), "\"SELL\"");
    }

    #[test]
    fn test_total_prefers_positive_usdc_size() {
        let total = Trade::resolve_total(dec!(10), dec!(0.5), Some(dec!(4.87)));
        assert_eq!(total, dec!(4.87));
    }

    #[test]
    fn test_total_falls_back_to_size_times_price() {
        assert_eq!(Trade::resolve_total(dec!(10), dec!(0.5), None), dec!(5));
        assert_eq!(Trade::resolve_total(dec!(10), dec!(0.5), Some(dec!(0))), dec!(5));
        assert_eq!(
            Trade::resolve_total(dec!(10), dec!(0.5), Some(dec!(-1))),
            dec!(5)
        );
    }
}
