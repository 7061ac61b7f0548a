use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::{MarketSlot, RankedEventRow, RawMarketRecord};

/// Group flat market rows by event ticker and keep the two most liquid
/// markets per event, reshaped wide into slot 1 / slot 2.
///
/// Rows with a null ticker or null liquidity cannot be ranked and are
/// dropped; an event with no rankable market produces no output row.
/// The in-group sort is stable, so markets with equal liquidity keep their
/// fetch order and the earlier-fetched one wins slot 1. Output rows are
/// ordered by event ticker ascending.
pub fn rank_top_two(rows: &[RawMarketRecord]) -> Vec<RankedEventRow> {
    let mut groups: BTreeMap<&str, Vec<&RawMarketRecord>> = BTreeMap::new();
    for row in rows {
        let (Some(ticker), Some(_)) = (row.event_ticker.as_deref(), row.liquidity) else {
            continue;
        };
        groups.entry(ticker).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(ticker, mut group)| {
            group.sort_by(|a, b| {
                b.liquidity
                    .partial_cmp(&a.liquidity)
                    .unwrap_or(Ordering::Equal)
            });
            RankedEventRow {
                event_ticker: ticker.to_string(),
                m1: MarketSlot::from_record(group[0]),
                m2: group.get(1).map(|r| MarketSlot::from_record(r)),
            }
        })
        .collect()
}
