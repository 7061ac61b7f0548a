use crate::pipeline::num::Nullable;
use crate::types::{AnnotatedEventRow, LiquidityRating, RankedEventRow};

/// Derive the spread, spread percentage, midprice, and liquidity rating for
/// each ranked event row. Adds columns only; slot data passes through
/// untouched and cardinality is unchanged.
pub fn annotate(rows: Vec<RankedEventRow>) -> Vec<AnnotatedEventRow> {
    rows.into_iter().map(annotate_row).collect()
}

fn annotate_row(row: RankedEventRow) -> AnnotatedEventRow {
    let yes_bid = Nullable::from(row.m1.yes_bid);
    let yes_ask = Nullable::from(row.m1.yes_ask);
    let no_bid = Nullable::from(row.m1.no_bid);

    // May be negative on a crossed book; deliberately not clamped.
    let spread = yes_ask - yes_bid;

    // A zero or missing ask masks the percentage to 0.0 outright. The 0.0
    // sentinel covers both "no ask available" and "zero spread against a
    // zero ask"; sheet consumers expect that conflation.
    let spread_pct = match row.m1.yes_ask {
        Some(ask) if ask != 0.0 => (spread / Nullable::some(ask)).get(),
        _ => Some(0.0),
    };

    let midprice = ((yes_bid + no_bid) / Nullable::some(2.0)).get();

    AnnotatedEventRow {
        liquidity_rating: LiquidityRating::from_spread(spread.get()),
        yes_spread_m1: spread.get(),
        yes_spread_m1_percentage: spread_pct,
        midprice_m1: midprice,
        row,
    }
}
