//! The fetch-to-sheet transformation: flatten nested event pages into
//! market rows, keep the two most liquid markets per event, and derive the
//! spread metrics. Every stage is a pure table-to-table function; no stage
//! mutates its input.

pub mod annotator;
pub mod normalizer;
pub mod num;
pub mod ranker;

use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::types::AnnotatedEventRow;

/// Run the three stages over raw event page payloads.
pub fn run_pipeline(pages: &[Value]) -> Result<Vec<AnnotatedEventRow>> {
    let records = normalizer::normalize_pages(pages)?;
    info!(rows = records.len(), "Normalized {} market rows", records.len());

    let ranked = ranker::rank_top_two(&records);
    info!(events = ranked.len(), "Ranked top 2 markets for {} events", ranked.len());

    Ok(annotator::annotate(ranked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LiquidityRating;
    use serde_json::json;

    fn market(ticker: &str, liquidity: f64, yes_bid: f64, yes_ask: f64) -> Value {
        json!({
            "event_ticker": ticker,
            "liquidity": liquidity,
            "liquidity_dollars": liquidity,
            "market_type": "binary",
            "no_ask": (1.0 - yes_bid), "no_ask_dollars": (1.0 - yes_bid),
            "no_bid": (1.0 - yes_ask), "no_bid_dollars": (1.0 - yes_ask),
            "no_sub_title": "No",
            "title": format!("{ticker} market"),
            "yes_ask": yes_ask, "yes_ask_dollars": yes_ask,
            "yes_bid": yes_bid, "yes_bid_dollars": yes_bid,
            "yes_sub_title": "Yes",
        })
    }

    fn single_event_page() -> Value {
        json!({
            "events": [{
                "ticker": "E1",
                "markets": [
                    market("E1", 100.0, 0.40, 0.45),
                    market("E1", 50.0, 0.30, 0.35),
                ],
            }],
            "cursor": "",
        })
    }

    #[test]
    fn end_to_end_single_event() {
        let out = run_pipeline(&[single_event_page()]).unwrap();
        assert_eq!(out.len(), 1);

        let a = &out[0];
        assert_eq!(a.row.event_ticker, "E1");
        assert_eq!(a.row.m1.yes_bid, Some(0.40));
        assert_eq!(a.row.m1.yes_ask, Some(0.45));
        let m2 = a.row.m2.as_ref().unwrap();
        assert_eq!(m2.yes_bid, Some(0.30));
        assert_eq!(m2.yes_ask, Some(0.35));

        assert!((a.yes_spread_m1.unwrap() - 0.05).abs() < 1e-9);
        assert!((a.yes_spread_m1_percentage.unwrap() - 0.111).abs() < 1e-3);
        assert_eq!(a.liquidity_rating, LiquidityRating::Low);
    }

    #[test]
    fn pipeline_is_deterministic_on_identical_input() {
        let pages = vec![
            single_event_page(),
            json!({
                "events": [{
                    "ticker": "E2",
                    "markets": [market("E2", 10.0, 0.10, 0.12)],
                }],
                "cursor": "",
            }),
        ];

        let first = run_pipeline(&pages).unwrap();
        let second = run_pipeline(&pages).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_pages_flow_through_every_stage() {
        assert!(run_pipeline(&[]).unwrap().is_empty());
        let page = json!({ "events": [], "cursor": "" });
        assert!(run_pipeline(&[page]).unwrap().is_empty());
    }
}
