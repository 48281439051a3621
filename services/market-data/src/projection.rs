//! Projection functions over the order book
//!
//! Both are pure: they read the book, allocate only their output record,
//! and stamp it with the caller-supplied timestamp.

use matching_engine::OrderBook;

use crate::events::MarketDataEvent;

/// Best bid and offer as of the book's current state
pub fn bbo(book: &OrderBook, timestamp: u64) -> MarketDataEvent {
    MarketDataEvent::Bbo {
        symbol: book.symbol().clone(),
        bid: book.best_bid(),
        ask: book.best_ask(),
        timestamp,
    }
}

/// Aggregated depth: up to `depth` best levels per side
pub fn l2_update(book: &OrderBook, depth: usize, timestamp: u64) -> MarketDataEvent {
    let snapshot = book.depth_snapshot(depth);
    MarketDataEvent::L2Update {
        timestamp,
        symbol: book.symbol().clone(),
        bids: snapshot.bids,
        asks: snapshot.asks,
    }
}
