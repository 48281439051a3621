//! Order sides, types, and the order record

use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The contra side this order matches against
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Execution semantics of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at best available prices; residual is discarded
    Market,
    /// Execute at the limit price or better; residual rests on the book
    Limit,
    /// Immediate-or-cancel: like limit, but residual is discarded
    Ioc,
    /// Fill-or-kill: full fill within the limit, or no trades at all
    Fok,
}

impl OrderType {
    /// Whether this type carries a limit price
    pub fn is_priced(&self) -> bool {
        !matches!(self, OrderType::Market)
    }
}

/// A single order flowing through the engine
///
/// `price` is `None` only for market orders. `remaining_quantity` starts at
/// `quantity` and only decreases as fills are applied; the invariant
/// `0 <= remaining_quantity <= quantity` holds throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    /// Arrival time (audit only; time priority comes from arrival order)
    pub timestamp: u64,
}

impl Order {
    /// Create a new order with full remaining quantity
    ///
    /// # Panics
    /// Panics if a priced order type is given no price
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        price: Option<Price>,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        assert!(
            !order_type.is_priced() || price.is_some(),
            "priced order type requires a price"
        );
        Self {
            id,
            symbol,
            side,
            order_type,
            price,
            quantity,
            remaining_quantity: quantity,
            timestamp,
        }
    }

    pub fn market(id: OrderId, symbol: Symbol, side: Side, quantity: Quantity, timestamp: u64) -> Self {
        Self::new(id, symbol, side, OrderType::Market, None, quantity, timestamp)
    }

    pub fn limit(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::Limit, Some(price), quantity, timestamp)
    }

    pub fn ioc(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::Ioc, Some(price), quantity, timestamp)
    }

    pub fn fok(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::Fok, Some(price), quantity, timestamp)
    }

    /// Apply a fill, reducing the remaining quantity
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.remaining_quantity,
            "fill would exceed remaining quantity"
        );
        self.remaining_quantity = self.remaining_quantity - quantity;
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Quantity consumed by matching so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining_quantity
    }
}
