//! Bid (buy-side) price levels
//!
//! Levels are keyed by price in a BTreeMap; the best bid is the highest key.
//! BTreeMap iteration is ascending, so best-first traversal runs in reverse.

use std::collections::BTreeMap;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;

/// Buy-side book: price levels best-first by descending price
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// The level at `price`, created empty if absent
    pub fn level_mut(&mut self, price: Price) -> &mut PriceLevel {
        self.levels.entry(price).or_default()
    }

    pub fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    pub fn remove_level(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    /// Highest bid price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Top `depth` levels as (price, total quantity), best first
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Total quantity resting at or above `limit`, walking best-first
    pub fn liquidity_at_or_above(&self, limit: Price) -> Quantity {
        self.levels
            .iter()
            .rev()
            .take_while(|(price, _)| **price >= limit)
            .fold(Quantity::zero(), |acc, (_, level)| acc + level.total_quantity())
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
