use serde_json::Value;

use crate::error::{AppError, Result};
use crate::types::RawMarketRecord;

/// The fixed column set carried downstream. Anything else in the payload is
/// dropped; any of these never appearing in the data at all is fatal.
pub const EXPECTED_COLUMNS: [&str; 15] = [
    "event_ticker",
    "liquidity",
    "liquidity_dollars",
    "market_type",
    "no_ask",
    "no_ask_dollars",
    "no_bid",
    "no_bid_dollars",
    "no_sub_title",
    "title",
    "yes_ask",
    "yes_ask_dollars",
    "yes_bid",
    "yes_bid_dollars",
    "yes_sub_title",
];

/// Flatten nested event→market page payloads into one row per market, in
/// page order and in source order within each page.
///
/// Per-row absence of an expected field degrades to null for that row; a
/// field absent from every row is a schema error (`MissingField`). Zero
/// pages or zero markets is an empty table, not an error.
pub fn normalize_pages(pages: &[Value]) -> Result<Vec<RawMarketRecord>> {
    let mut rows = Vec::new();
    let mut seen = [false; EXPECTED_COLUMNS.len()];

    for page in pages {
        let events = page
            .get("events")
            .and_then(|e| e.as_array())
            .ok_or_else(|| AppError::MissingField("events".to_string()))?;

        for event in events {
            let parent_ticker = event.get("ticker").and_then(|t| t.as_str());
            let markets = event
                .get("markets")
                .and_then(|m| m.as_array())
                .ok_or_else(|| AppError::MissingField("markets".to_string()))?;

            for market in markets {
                for (i, col) in EXPECTED_COLUMNS.iter().enumerate() {
                    if market.get(col).is_some() {
                        seen[i] = true;
                    }
                }
                // The market row normally carries its own event_ticker; the
                // parent event's ticker covers payloads that omit it.
                if parent_ticker.is_some() {
                    seen[0] = true;
                }

                let event_ticker = market
                    .get("event_ticker")
                    .and_then(|t| t.as_str())
                    .or(parent_ticker)
                    .map(str::to_string);

                rows.push(RawMarketRecord {
                    event_ticker,
                    market_type: get_text(market, "market_type"),
                    title: get_text(market, "title"),
                    yes_sub_title: get_text(market, "yes_sub_title"),
                    no_sub_title: get_text(market, "no_sub_title"),
                    liquidity: get_numeric(market, "liquidity"),
                    liquidity_dollars: get_numeric(market, "liquidity_dollars"),
                    yes_bid: get_numeric(market, "yes_bid"),
                    yes_ask: get_numeric(market, "yes_ask"),
                    yes_bid_dollars: get_numeric(market, "yes_bid_dollars"),
                    yes_ask_dollars: get_numeric(market, "yes_ask_dollars"),
                    no_bid: get_numeric(market, "no_bid"),
                    no_ask: get_numeric(market, "no_ask"),
                    no_bid_dollars: get_numeric(market, "no_bid_dollars"),
                    no_ask_dollars: get_numeric(market, "no_ask_dollars"),
                });
            }
        }
    }

    if !rows.is_empty() {
        for (i, col) in EXPECTED_COLUMNS.iter().enumerate() {
            if !seen[i] {
                return Err(AppError::MissingField((*col).to_string()));
            }
        }
    }

    Ok(rows)
}

fn get_text(market: &Value, key: &str) -> Option<String> {
    market.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Coerce a JSON value to f64: numbers pass through, numeric strings parse.
/// Anything else — missing, null, unparsable, NaN — is null, never an error.
fn get_numeric(market: &Value, key: &str) -> Option<f64> {
    let v = market.get(key)?;
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n| !n.is_nan())
}
