//! Arbitrage scan results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A market whose YES+NO prices sum below $1.00
///
/// One per scanned market, rebuilt on every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageOpportunity {
    /// Market question
    pub question: String,

    /// Market URL slug
    pub slug: String,

    /// Current YES price
    pub yes_price: Decimal,

    /// Current NO price
    pub no_price: Decimal,

    /// yes_price + no_price
    pub combined_cost: Decimal,

    /// 1 - combined_cost
    pub potential_profit: Decimal,

    /// Canonical market URL (parent event slug preferred over market slug)
    pub market_url: String,

    /// 24-hour volume reported by the listing endpoint
    pub volume_24hr: Decimal,
}
