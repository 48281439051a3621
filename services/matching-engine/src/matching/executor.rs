//! Trade generation
//!
//! Owns the engine-wide monotone trade counter and builds trade records.
//! Every trade is priced at the maker's resting price, and the incoming
//! order is always the aggressor.

use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Builds trades and hands out gapless sequential trade ids
#[derive(Debug, Default)]
pub struct MatchExecutor {
    trade_counter: u64,
}

impl MatchExecutor {
    pub fn new() -> Self {
        Self { trade_counter: 0 }
    }

    /// Next trade id; the counter is 1-based so the first trade is T0001
    fn next_trade_id(&mut self) -> TradeId {
        self.trade_counter += 1;
        TradeId::from_sequence(self.trade_counter)
    }

    /// Build the trade for one fill
    #[allow(clippy::too_many_arguments)]
    pub fn record_trade(
        &mut self,
        symbol: Symbol,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        timestamp: u64,
    ) -> Trade {
        Trade::new(
            self.next_trade_id(),
            symbol,
            maker_order_id,
            taker_order_id,
            price,
            quantity,
            aggressor_side,
            timestamp,
        )
    }
}
