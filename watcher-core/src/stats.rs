//! Derived portfolio statistics
//!
//! Stats are recomputed from the full trade list on every change and never
//! persisted.

use crate::trade::{Trade, TradeSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio-level metrics over a trade list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of trades
    pub total_trades: usize,

    /// Sum of USD notionals across all trades
    pub total_volume: Decimal,

    /// Sell volume minus buy volume.
    ///
    /// This is a realized cash-flow proxy, not a mark-to-market P&L: it
    /// ignores open-position valuation and market resolution outcomes.
    pub pnl: Decimal,

    /// Reserved. Win/loss determination needs market settlement data the
    /// dashboard does not have, so this is always zero.
    pub win_rate: Decimal,

    /// total_volume / total_trades, zero for an empty list
    pub average_trade_size: Decimal,
}

impl DashboardStats {
    /// Reduce a trade list into dashboard stats
    pub fn from_trades(trades: &[Trade]) -> Self {
        let total_volume: Decimal = trades.iter().map(|t| t.total).sum();
        let buy_volume: Decimal = trades
            .iter()
            .filter(|t| t.side == TradeSide::Buy)
            .map(|t| t.total)
            .sum();
        let sell_volume: Decimal = trades
            .iter()
            .filter(|t| t.side == TradeSide::Sell)
            .map(|t| t.total)
            .sum();

        let average_trade_size = if trades.is_empty() {
            Decimal::ZERO
        } else {
            total_volume / Decimal::from(trades.len())
        };

        DashboardStats {
            total_trades: trades.len(),
            total_volume,
            pnl: sell_volume - buy_volume,
            win_rate: Decimal::ZERO,
            average_trade_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn trade(side: TradeSide, total: Decimal) -> Trade {
        Trade {
            id: format!("{}-{}", side, total),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            market: "Test market".to_string(),
            side,
            size: dec!(1),
            price: dec!(0.5),
            total,
            outcome: "Yes".to_string(),
        }
    }

    #[test]
    fn test_empty_trade_list_yields_zeroes() {
        let stats = DashboardStats::from_trades(&[]);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.total_volume, Decimal::ZERO);
        assert_eq!(stats.pnl, Decimal::ZERO);
        assert_eq!(stats.win_rate, Decimal::ZERO);
        // No division by zero
        assert_eq!(stats.average_trade_size, Decimal::ZERO);
    }

    #[test]
    fn test_pnl_is_sell_minus_buy_volume() {
        let trades = vec![
            trade(TradeSide::Buy, dec!(100)),
            trade(TradeSide::Sell, dec!(150)),
        ];
        let stats = DashboardStats::from_trades(&trades);
        assert_eq!(stats.total_trades, 2);
        assert_eq!(stats.total_volume, dec!(250));
        assert_eq!(stats.pnl, dec!(50));
        assert_eq!(stats.average_trade_size, dec!(125));
    }

    #[test]
    fn test_win_rate_stays_reserved() {
        let trades = vec![trade(TradeSide::Sell, dec!(10))];
        assert_eq!(DashboardStats::from_trades(&trades).win_rate, Decimal::ZERO);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(DashboardStats::from_trades(&[])).unwrap();
        assert!(json.get("totalTrades").is_some());
        assert!(json.get("averageTradeSize").is_some());
        assert!(json.get("winRate").is_some());
    }
}
