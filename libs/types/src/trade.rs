//! Trade execution records
//!
//! A trade is the atomic unit of output: one fill between a resting maker
//! and an incoming taker. It serializes to the egress wire shape directly.

use crate::ids::{OrderId, Symbol, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One fill between a maker and a taker
///
/// The price is always the maker's resting price; price improvement accrues
/// to the taker. `aggressor_side` is the taker's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub aggressor_side: Side,
    pub timestamp: u64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: TradeId,
        symbol: Symbol,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        timestamp: u64,
    ) -> Self {
        Self {
            trade_id,
            symbol,
            maker_order_id,
            taker_order_id,
            price,
            quantity,
            aggressor_side,
            timestamp,
        }
    }

    /// Traded value (price × quantity) in quote currency
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * self.quantity.as_decimal()
    }
}
