//! Egress record shapes for market-data consumers
//!
//! Serialized by the publishing glue; the `type` tag discriminates records
//! on the wire. Prices and quantities serialize as strings, and L2 levels as
//! `[price, quantity]` pairs.

use serde::{Deserialize, Serialize};
use types::ids::Symbol;
use types::numeric::{Price, Quantity};

/// A published market-data record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MarketDataEvent {
    /// Best bid and offer; either side is null when that side is empty
    #[serde(rename = "bbo")]
    Bbo {
        symbol: Symbol,
        bid: Option<Price>,
        ask: Option<Price>,
        timestamp: u64,
    },

    /// Aggregated depth: up to K levels per side, bids descending and asks
    /// ascending by price
    #[serde(rename = "l2_update")]
    L2Update {
        timestamp: u64,
        symbol: Symbol,
        bids: Vec<(Price, Quantity)>,
        asks: Vec<(Price, Quantity)>,
    },
}
