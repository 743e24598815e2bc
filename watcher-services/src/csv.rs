//! CSV import for trade exports
//!
//! Parses an uploaded comma-delimited export into the same canonical trade
//! list the live fetch path produces. Unlike the live path, which preserves
//! upstream order, the parsed list is sorted most recent first.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;
use watcher_core::{Trade, TradeSide};

/// Parse CSV text into a trade list, sorted descending by timestamp.
///
/// The first line is the header row; column positions are resolved by
/// header name, so the file's column order does not matter. A header that
/// is missing leaves that column absent for every row. Rows without a
/// usable timestamp are dropped; everything else falls back to the same
/// defaults as the live normalizer. Header-only or empty input yields an
/// empty list.
pub fn parse_csv(text: &str) -> Vec<Trade> {
    let mut lines = text.lines();

    let headers: Vec<String> = match lines.next() {
        Some(header) => split_line(header)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    let idx_timestamp = column(&headers, "timestampIso");
    let idx_market = column(&headers, "marketQuestion");
    let idx_side = column(&headers, "side");
    let idx_size = column(&headers, "size");
    let idx_price = column(&headers, "price");
    let idx_usdc = column(&headers, "usdcSize");
    let idx_outcome = column(&headers, "outcome");
    let idx_hash = column(&headers, "transactionHash");

    let mut trades = Vec::new();

    for (row, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let values = split_line(line);

        let raw_timestamp = field(&values, idx_timestamp);
        if raw_timestamp.is_empty() {
            continue;
        }
        let timestamp = match DateTime::parse_from_rfc3339(raw_timestamp) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                debug!(
                    "Skipping CSV row {}: unparseable timestamp {:?}: {}",
                    row + 1,
                    raw_timestamp,
                    e
                );
                continue;
            }
        };

        let size = parse_decimal(field(&values, idx_size));
        let price = parse_decimal(field(&values, idx_price));
        let usdc = parse_decimal(field(&values, idx_usdc));

        let hash = field(&values, idx_hash);
        let market = field(&values, idx_market);
        let outcome = field(&values, idx_outcome);

        trades.push(Trade {
            id: if hash.is_empty() {
                format!("csv-{}", row + 1)
            } else {
                hash.to_string()
            },
            timestamp,
            market: if market.is_empty() {
                "Unknown Market".to_string()
            } else {
                market.to_string()
            },
            side: TradeSide::from_raw(Some(field(&values, idx_side))),
            size,
            price,
            total: Trade::resolve_total(size, price, Some(usdc)),
            outcome: if outcome.is_empty() {
                "Unknown".to_string()
            } else {
                outcome.to_string()
            },
        });
    }

    trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    trades
}

/// Position of a header by exact name, absent when the file lacks it
fn column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Split one CSV line into fields, honoring double-quoted content.
///
/// Commas inside quotes do not separate fields; a doubled double-quote
/// inside a quoted field is an escaped literal quote. Quote state never
/// crosses a line boundary.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

/// Fetch a field by resolved column position, empty when absent
fn field<'a>(values: &'a [String], index: Option<usize>) -> &'a str {
    index
        .and_then(|i| values.get(i))
        .map(|v| v.trim())
        .unwrap_or("")
}

fn parse_decimal(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str =
        "timestampIso,marketQuestion,side,size,price,usdcSize,outcome,transactionHash";

    #[test]
    fn test_rows_sorted_descending_by_timestamp() {
        let csv = format!(
            "{}\n\
             2024-03-01T10:00:00Z,Market A,BUY,10,0.5,5,Yes,h1\n\
             2024-03-02T10:00:00Z,Market A,SELL,20,0.6,12,No,h2\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, "h2");
        assert_eq!(trades[0].side, TradeSide::Sell);
        assert_eq!(trades[1].id, "h1");
        assert!(trades[0].timestamp > trades[1].timestamp);
    }

    #[test]
    fn test_quoted_field_with_comma_stays_one_value() {
        let csv = format!(
            "{}\n\
             2024-03-01T10:00:00Z,\"Will candidate, X win?\",BUY,10,0.5,5,Yes,h1\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].market, "Will candidate, X win?");
        assert_eq!(trades[0].outcome, "Yes");
    }

    #[test]
    fn test_doubled_quotes_unescape() {
        let csv = format!(
            "{}\n\
             2024-03-01T10:00:00Z,\"The \"\"big\"\" one, maybe\",SELL,1,0.9,,No,h1\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        assert_eq!(trades[0].market, "The \"big\" one, maybe");
    }

    #[test]
    fn test_header_order_is_irrelevant() {
        let csv = "side,transactionHash,timestampIso,price,size,usdcSize,marketQuestion,outcome\n\
                   sell,h9,2024-03-01T10:00:00Z,0.25,4,,Market B,No\n";
        let trades = parse_csv(csv);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, "h9");
        assert_eq!(trades[0].side, TradeSide::Sell);
        assert_eq!(trades[0].market, "Market B");
        assert_eq!(trades[0].total, dec!(1));
    }

    #[test]
    fn test_missing_header_leaves_column_absent() {
        // No usdcSize column at all: total falls back to size * price
        let csv = "timestampIso,marketQuestion,side,size,price,outcome,transactionHash\n\
                   2024-03-01T10:00:00Z,Market C,BUY,10,0.5,Yes,h1\n";
        let trades = parse_csv(csv);
        assert_eq!(trades[0].total, dec!(5));
    }

    #[test]
    fn test_usdc_size_preferred_when_positive() {
        let csv = format!(
            "{}\n\
             2024-03-01T10:00:00Z,Market A,BUY,10,0.5,4.87,Yes,h1\n\
             2024-03-02T10:00:00Z,Market A,BUY,10,0.5,0,Yes,h2\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        assert_eq!(trades[1].total, dec!(4.87));
        assert_eq!(trades[0].total, dec!(5));
    }

    #[test]
    fn test_missing_hash_synthesizes_row_id() {
        let csv = format!(
            "{}\n\
             2024-03-01T10:00:00Z,Market A,BUY,10,0.5,5,Yes,\n\
             \n\
             2024-03-02T10:00:00Z,Market A,BUY,10,0.5,5,Yes,\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        // Row indices count file lines, so ids stay stable across blanks
        assert_eq!(trades[0].id, "csv-3");
        assert_eq!(trades[1].id, "csv-1");
    }

    #[test]
    fn test_rows_without_timestamp_are_dropped() {
        let csv = format!(
            "{}\n\
             ,Market A,BUY,10,0.5,5,Yes,h1\n\
             not-a-date,Market A,BUY,10,0.5,5,Yes,h2\n\
             2024-03-01T10:00:00Z,Market A,BUY,10,0.5,5,Yes,h3\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, "h3");
    }

    #[test]
    fn test_header_only_or_empty_yields_empty() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv(HEADER).is_empty());
        assert!(parse_csv(&format!("{}\n\n\n", HEADER)).is_empty());
    }

    #[test]
    fn test_defaults_for_blank_fields() {
        let csv = format!(
            "{}\n\
             2024-03-01T10:00:00Z,,weird,,,,,\n",
            HEADER
        );
        let trades = parse_csv(&csv);
        assert_eq!(trades[0].market, "Unknown Market");
        assert_eq!(trades[0].side, TradeSide::Buy);
        assert_eq!(trades[0].size, Decimal::ZERO);
        assert_eq!(trades[0].price, Decimal::ZERO);
        assert_eq!(trades[0].total, Decimal::ZERO);
        assert_eq!(trades[0].outcome, "Unknown");
        assert_eq!(trades[0].id, "csv-1");
    }
}
