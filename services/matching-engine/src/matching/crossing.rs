//! Price-compatibility predicates
//!
//! A limit-style order matches only while its limit crosses the contra-side
//! best; market orders take any price and never consult these.

use types::numeric::Price;
use types::order::Side;

/// A bid and an ask can trade iff the bid is at or above the ask
pub fn crosses(bid: Price, ask: Price) -> bool {
    bid >= ask
}

/// Whether an incoming limit-style order can trade against the contra best
///
/// A buy is marketable while its limit is at or above the best ask; a sell
/// while its limit is at or below the best bid. Exact equality trades.
pub fn is_marketable(side: Side, limit: Price, best_contra: Price) -> bool {
    match side {
        Side::Buy => limit >= best_contra,
        Side::Sell => limit <= best_contra,
    }
}
