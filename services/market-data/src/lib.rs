//! Market-data projection
//!
//! Derives the published market-data views from an order book: the best
//! bid/offer and the aggregated top-of-book depth. Projections are pure
//! reads of the book as of the most recent processed order; timestamps come
//! from the caller, never from a clock read here.

pub mod events;
pub mod projection;

pub use events::MarketDataEvent;
pub use projection::{bbo, l2_update};
