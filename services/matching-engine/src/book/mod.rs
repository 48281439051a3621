//! Per-symbol order book
//!
//! Two price-ordered side books with FIFO queues per price level, plus a
//! central order index for O(1) cancellation by id.

mod ask_book;
mod bid_book;
mod order_book;
mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use order_book::{DepthSnapshot, OrderBook};
pub use price_level::PriceLevel;
