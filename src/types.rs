use serde_json::{json, Value};

use crate::config::HIGH_LIQUIDITY_SPREAD_MAX;
use crate::pipeline::num::Nullable;

// ---------------------------------------------------------------------------
// Flat market rows (one per market, straight off the API)
// ---------------------------------------------------------------------------

/// One market flattened out of the nested event payload. String fields that
/// were absent and numeric fields that failed coercion are None, never an
/// error — schema-level absence is caught by the normalizer instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawMarketRecord {
    pub event_ticker: Option<String>,
    pub market_type: Option<String>,
    pub title: Option<String>,
    pub yes_sub_title: Option<String>,
    pub no_sub_title: Option<String>,
    pub liquidity: Option<f64>,
    pub liquidity_dollars: Option<f64>,
    pub yes_bid: Option<f64>,
    pub yes_ask: Option<f64>,
    pub yes_bid_dollars: Option<f64>,
    pub yes_ask_dollars: Option<f64>,
    pub no_bid: Option<f64>,
    pub no_ask: Option<f64>,
    pub no_bid_dollars: Option<f64>,
    pub no_ask_dollars: Option<f64>,
}

// ---------------------------------------------------------------------------
// Ranked event rows (one per event, two market slots)
// ---------------------------------------------------------------------------

/// The per-market fields carried into a ranked slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSlot {
    pub title: Option<String>,
    pub yes_sub_title: Option<String>,
    pub no_sub_title: Option<String>,
    pub liquidity: Option<f64>,
    pub liquidity_dollars: Option<f64>,
    pub yes_bid: Option<f64>,
    pub yes_ask: Option<f64>,
    pub yes_bid_dollars: Option<f64>,
    pub yes_ask_dollars: Option<f64>,
    pub no_bid: Option<f64>,
    pub no_ask: Option<f64>,
    pub no_bid_dollars: Option<f64>,
    pub no_ask_dollars: Option<f64>,
}

impl MarketSlot {
    pub fn from_record(r: &RawMarketRecord) -> Self {
        Self {
            title: r.title.clone(),
            yes_sub_title: r.yes_sub_title.clone(),
            no_sub_title: r.no_sub_title.clone(),
            liquidity: r.liquidity,
            liquidity_dollars: r.liquidity_dollars,
            yes_bid: r.yes_bid,
            yes_ask: r.yes_ask,
            yes_bid_dollars: r.yes_bid_dollars,
            yes_ask_dollars: r.yes_ask_dollars,
            no_bid: r.no_bid,
            no_ask: r.no_ask,
            no_bid_dollars: r.no_bid_dollars,
            no_ask_dollars: r.no_ask_dollars,
        }
    }
}

/// One event, reshaped wide: slot 1 is the most liquid market, slot 2 the
/// second most liquid (None when the event has only one qualifying market).
/// Slot 1 always exists — events with zero qualifying markets never produce
/// a row at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEventRow {
    pub event_ticker: String,
    pub m1: MarketSlot,
    pub m2: Option<MarketSlot>,
}

// ---------------------------------------------------------------------------
// Annotated event rows (ranked row + derived metrics)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityRating {
    High,
    Low,
}

impl LiquidityRating {
    /// High iff the slot-1 yes spread is known and at most the threshold.
    /// An unknown spread can never rate High.
    pub fn from_spread(spread: Option<f64>) -> Self {
        if Nullable::from(spread).le(HIGH_LIQUIDITY_SPREAD_MAX) {
            LiquidityRating::High
        } else {
            LiquidityRating::Low
        }
    }
}

impl std::fmt::Display for LiquidityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LiquidityRating::High => "High",
            LiquidityRating::Low => "Low",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedEventRow {
    pub row: RankedEventRow,
    /// yes_ask_m1 − yes_bid_m1. May be negative on a crossed book; never clamped.
    pub yes_spread_m1: Option<f64>,
    /// Spread over ask. Zero or missing ask masks the whole cell to 0.0;
    /// a present ask with an unknown spread stays None.
    pub yes_spread_m1_percentage: Option<f64>,
    /// (yes_bid_m1 + no_bid_m1) / 2.
    pub midprice_m1: Option<f64>,
    pub liquidity_rating: LiquidityRating,
}

// ---------------------------------------------------------------------------
// Sheet layout
// ---------------------------------------------------------------------------

/// Canonical published column order. The event ticker is the row key and is
/// not written as a column.
pub const SHEET_HEADERS: [&str; 15] = [
    "title_m1",
    "yes_sub_title_m1",
    "yes_bid_m1",
    "yes_ask_m1",
    "no_bid_m1",
    "no_ask_m1",
    "yes_sub_title_m2",
    "yes_bid_m2",
    "yes_ask_m2",
    "no_bid_m2",
    "no_ask_m2",
    "yes_spread_m1",
    "yes_spread_m1_percentage",
    "midprice_m1",
    "Liquidity_Rating",
];

fn text_cell(v: &Option<String>) -> Value {
    match v {
        Some(s) => json!(s),
        None => json!(""),
    }
}

fn num_cell(v: Option<f64>) -> Value {
    match v {
        Some(n) => json!(n),
        None => json!(""),
    }
}

impl AnnotatedEventRow {
    /// Cells in `SHEET_HEADERS` order. Nulls become empty cells.
    pub fn cells(&self) -> Vec<Value> {
        let m1 = &self.row.m1;
        let m2 = self.row.m2.as_ref();
        vec![
            text_cell(&m1.title),
            text_cell(&m1.yes_sub_title),
            num_cell(m1.yes_bid),
            num_cell(m1.yes_ask),
            num_cell(m1.no_bid),
            num_cell(m1.no_ask),
            text_cell(&m2.and_then(|s| s.yes_sub_title.clone())),
            num_cell(m2.and_then(|s| s.yes_bid)),
            num_cell(m2.and_then(|s| s.yes_ask)),
            num_cell(m2.and_then(|s| s.no_bid)),
            num_cell(m2.and_then(|s| s.no_ask)),
            num_cell(self.yes_spread_m1),
            num_cell(self.yes_spread_m1_percentage),
            num_cell(self.midprice_m1),
            json!(self.liquidity_rating.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_boundary_is_inclusive_on_high_side() {
        assert_eq!(LiquidityRating::from_spread(Some(0.02)), LiquidityRating::High);
        assert_eq!(LiquidityRating::from_spread(Some(0.0201)), LiquidityRating::Low);
    }

    #[test]
    fn unknown_spread_rates_low() {
        assert_eq!(LiquidityRating::from_spread(None), LiquidityRating::Low);
    }

    #[test]
    fn negative_spread_rates_high() {
        // A crossed book is below the threshold, same as the source behavior.
        assert_eq!(LiquidityRating::from_spread(Some(-0.05)), LiquidityRating::High);
    }

    #[test]
    fn cells_follow_canonical_order_and_blank_out_missing_slot_2() {
        let m1 = MarketSlot {
            title: Some("Who wins?".to_string()),
            yes_sub_title: Some("Candidate A".to_string()),
            no_sub_title: None,
            liquidity: Some(100.0),
            liquidity_dollars: None,
            yes_bid: Some(0.40),
            yes_ask: Some(0.45),
            yes_bid_dollars: None,
            yes_ask_dollars: None,
            no_bid: Some(0.50),
            no_ask: Some(0.55),
            no_bid_dollars: None,
            no_ask_dollars: None,
        };
        let annotated = AnnotatedEventRow {
            row: RankedEventRow {
                event_ticker: "E1".to_string(),
                m1,
                m2: None,
            },
            yes_spread_m1: Some(0.05),
            yes_spread_m1_percentage: Some(0.111),
            midprice_m1: Some(0.45),
            liquidity_rating: LiquidityRating::Low,
        };

        let cells = annotated.cells();
        assert_eq!(cells.len(), SHEET_HEADERS.len());
        assert_eq!(cells[0], json!("Who wins?"));
        assert_eq!(cells[2], json!(0.40));
        // Slot-2 columns are blank, not omitted.
        assert_eq!(cells[6], json!(""));
        assert_eq!(cells[7], json!(""));
        assert_eq!(cells[14], json!("Low"));
    }
}
