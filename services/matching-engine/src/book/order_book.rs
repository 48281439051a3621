//! The per-symbol order book aggregate
//!
//! Combines the two side books with a central order index. The index owns
//! every resting order and resolves an id in O(1), which is what makes
//! cancellation by id cheap: cancelling removes the order from the index and
//! leaves its queued id behind as a tombstone. Tombstones are discarded when
//! they reach the head of their queue (during matching, or when trimmed
//! right after a cancellation), and a level with no live orders left is
//! removed on the spot, so each tombstone is popped exactly once.

use std::collections::HashMap;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use super::ask_book::AskBook;
use super::bid_book::BidBook;
use super::price_level::PriceLevel;

/// Two-sided book for one symbol
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    /// Central index: every resting order lives here, keyed by id
    orders: HashMap<OrderId, Order>,
}

/// Aggregated top-of-book view: (price, total quantity) per level,
/// bids descending and asks ascending
#[derive(Debug, Clone, PartialEq)]
pub struct DepthSnapshot {
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Rest an order at the tail of its (side, price) level
    ///
    /// # Panics
    /// Panics if the order has no remaining quantity, no price, or an id
    /// that is already resting. These are caller bugs, not runtime errors.
    pub fn add_order(&mut self, order: Order) {
        assert!(
            !order.remaining_quantity.is_zero(),
            "resting order must have remaining quantity"
        );
        assert!(
            !self.orders.contains_key(&order.id),
            "order id already resting: {}",
            order.id
        );
        let price = order.price.expect("resting order carries a price");

        let level = match order.side {
            Side::Buy => self.bids.level_mut(price),
            Side::Sell => self.asks.level_mut(price),
        };
        level.enqueue(order.id.clone(), order.remaining_quantity);
        self.orders.insert(order.id.clone(), order);
    }

    /// Cancel a resting order by id
    ///
    /// Returns true iff the id was resting. Unknown ids (including already
    /// cancelled or fully filled ones) return false; repeating a cancel is
    /// harmless.
    pub fn cancel_order(&mut self, id: &OrderId) -> bool {
        let Some(order) = self.orders.remove(id) else {
            return false;
        };
        let price = order.price.expect("resting order carries a price");

        match order.side {
            Side::Buy => {
                let level = self.bids.get_mut(price).expect("resting order has a level");
                level.reduce_liquidity(order.remaining_quantity);
                level.drop_live();
                if level.is_dead() {
                    self.bids.remove_level(price);
                } else {
                    trim_tombstones(level, &self.orders);
                }
            }
            Side::Sell => {
                let level = self.asks.get_mut(price).expect("resting order has a level");
                level.reduce_liquidity(order.remaining_quantity);
                level.drop_live();
                if level.is_dead() {
                    self.asks.remove_level(price);
                } else {
                    trim_tombstones(level, &self.orders);
                }
            }
        }
        true
    }

    /// Highest resting bid price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting ask price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Best price on the given side
    pub fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
        }
    }

    /// Live resting orders at a level, in time priority order
    pub fn orders_at_price(
        &self,
        side: Side,
        price: Price,
    ) -> Option<impl Iterator<Item = &Order>> {
        let level = match side {
            Side::Buy => self.bids.get(price)?,
            Side::Sell => self.asks.get(price)?,
        };
        Some(level.iter().filter_map(move |id| self.orders.get(id)))
    }

    /// Total quantity on `side` at prices no worse than `limit`
    ///
    /// "No worse" is from the contra taker's perspective: asks at or below
    /// the limit, bids at or above it. Walks levels best-first and stops at
    /// the first level outside the limit.
    pub fn available_liquidity(&self, side: Side, limit: Price) -> Quantity {
        match side {
            Side::Buy => self.bids.liquidity_at_or_above(limit),
            Side::Sell => self.asks.liquidity_at_or_below(limit),
        }
    }

    /// Up to `depth` best levels per side as (price, total quantity)
    pub fn depth_snapshot(&self, depth: usize) -> DepthSnapshot {
        DepthSnapshot {
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    /// Total resting quantity at one level, zero if the level is absent
    pub fn total_quantity_at(&self, side: Side, price: Price) -> Quantity {
        let level = match side {
            Side::Buy => self.bids.get(price),
            Side::Sell => self.asks.get(price),
        };
        level.map_or(Quantity::zero(), PriceLevel::total_quantity)
    }

    /// Number of active price levels on one side
    pub fn price_level_count(&self, side: Side) -> usize {
        match side {
            Side::Buy => self.bids.level_count(),
            Side::Sell => self.asks.level_count(),
        }
    }

    /// The resting order with this id, if any
    pub fn resting_order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Number of live resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Head order of the level at (side, price): id and remaining quantity
    ///
    /// Skips and discards tombstones on the way. Returns None if the level
    /// is absent or holds no live order.
    pub(crate) fn front_of_level(&mut self, side: Side, price: Price) -> Option<(OrderId, Quantity)> {
        let level = match side {
            Side::Buy => self.bids.get_mut(price)?,
            Side::Sell => self.asks.get_mut(price)?,
        };
        trim_tombstones(level, &self.orders);
        let id = level.front()?.clone();
        let order = self.orders.get(&id)?;
        Some((id, order.remaining_quantity))
    }

    /// Fill the head order of the level at (side, price) by `quantity`
    ///
    /// Updates the order and the level's cached total. When the head is
    /// fully consumed it is popped and unindexed, and the level is dropped
    /// if it held no other live order.
    ///
    /// # Panics
    /// Panics if the level is absent or its head is not live; callers must
    /// have just observed the head via `front_of_level`.
    pub(crate) fn fill_front(&mut self, side: Side, price: Price, quantity: Quantity) {
        let level = match side {
            Side::Buy => self.bids.get_mut(price),
            Side::Sell => self.asks.get_mut(price),
        }
        .expect("fill targets an existing level");

        let id = level.front().cloned().expect("fill targets a non-empty level");
        let order = self.orders.get_mut(&id).expect("head of level is live");
        order.fill(quantity);
        let head_consumed = order.is_filled();

        level.reduce_liquidity(quantity);
        if head_consumed {
            self.orders.remove(&id);
            level.pop_front();
            level.drop_live();
            if level.is_dead() {
                match side {
                    Side::Buy => self.bids.remove_level(price),
                    Side::Sell => self.asks.remove_level(price),
                }
            }
        }
    }
}

/// Discard cancelled ids sitting at the head of a level's queue
fn trim_tombstones(level: &mut PriceLevel, orders: &HashMap<OrderId, Order>) {
    while let Some(front) = level.front() {
        if orders.contains_key(front) {
            break;
        }
        level.pop_front();
    }
}
