//! Matching engine core
//!
//! Routes incoming orders to the type-specific algorithm and runs the
//! price-time priority sweep against the contra side of the symbol's book.

use std::collections::HashMap;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, OrderType};
use types::trade::Trade;

use crate::book::OrderBook;
use crate::matching::{crossing, executor::MatchExecutor};

/// Price-time priority matching engine
///
/// Owns one book per symbol, the trade-id counter, and an append-only trade
/// history. Not thread-safe: callers serialize `process_order` invocations.
pub struct MatchingEngine {
    /// Order books per symbol, created on first reference
    books: HashMap<Symbol, OrderBook>,
    /// Trade generation with gapless sequential ids
    executor: MatchExecutor,
    /// Every trade ever emitted, in emission order; caller may clear
    trade_history: Vec<Trade>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
            executor: MatchExecutor::new(),
            trade_history: Vec::new(),
        }
    }

    /// Process one incoming order and return the trades it produced
    ///
    /// The single entry point. Trades are returned in emission order
    /// (best price first, FIFO within a price) and also appended to the
    /// engine's history.
    ///
    /// # Panics
    /// Panics on precondition violations: zero quantity, a partially
    /// consumed order, or a priced type without a price. Such inputs are
    /// rejected upstream and never reach the engine in lawful operation.
    pub fn process_order(&mut self, order: Order) -> Vec<Trade> {
        assert!(!order.quantity.is_zero(), "order quantity must be positive");
        assert!(
            order.remaining_quantity == order.quantity,
            "incoming order must be unfilled"
        );
        assert!(
            !order.order_type.is_priced() || order.price.is_some(),
            "{:?} order requires a price",
            order.order_type
        );

        let book = self
            .books
            .entry(order.symbol.clone())
            .or_insert_with_key(|symbol| OrderBook::new(symbol.clone()));
        let executor = &mut self.executor;

        let trades = match order.order_type {
            OrderType::Market => Self::match_market_order(book, executor, order),
            OrderType::Limit => Self::match_limit_order(book, executor, order),
            OrderType::Ioc => Self::match_ioc_order(book, executor, order),
            OrderType::Fok => Self::match_fok_order(book, executor, order),
        };

        self.trade_history.extend(trades.iter().cloned());
        trades
    }

    /// Market order: sweep at any price, discard whatever the book cannot fill
    fn match_market_order(
        book: &mut OrderBook,
        executor: &mut MatchExecutor,
        mut order: Order,
    ) -> Vec<Trade> {
        // Residual is discarded: a market order never rests
        Self::sweep(book, executor, &mut order, None)
    }

    /// Limit order: sweep while marketable, rest the residual at its price
    fn match_limit_order(
        book: &mut OrderBook,
        executor: &mut MatchExecutor,
        mut order: Order,
    ) -> Vec<Trade> {
        let limit = order.price.expect("limit order carries a price");
        let trades = Self::sweep(book, executor, &mut order, Some(limit));
        if !order.is_filled() {
            book.add_order(order);
        }
        trades
    }

    /// IOC order: sweep while marketable, discard the residual
    fn match_ioc_order(
        book: &mut OrderBook,
        executor: &mut MatchExecutor,
        mut order: Order,
    ) -> Vec<Trade> {
        let limit = order.price.expect("ioc order carries a price");
        Self::sweep(book, executor, &mut order, Some(limit))
    }

    /// FOK order: all-or-nothing
    ///
    /// Feasibility is checked against contra liquidity within the limit
    /// before any mutation; an infeasible order is a complete no-op. A
    /// feasible one runs the standard sweep, which then fills fully.
    fn match_fok_order(
        book: &mut OrderBook,
        executor: &mut MatchExecutor,
        mut order: Order,
    ) -> Vec<Trade> {
        let limit = order.price.expect("fok order carries a price");
        let contra = order.side.opposite();
        if book.available_liquidity(contra, limit) < order.quantity {
            return Vec::new();
        }

        let trades = Self::sweep(book, executor, &mut order, Some(limit));
        debug_assert!(order.is_filled(), "feasible fok must fill completely");
        trades
    }

    /// The shared matching loop
    ///
    /// Draws from the head of the best contra level while the order has
    /// remaining quantity and (for priced orders) the limit still crosses.
    /// Each fill executes at the maker's resting price.
    fn sweep(
        book: &mut OrderBook,
        executor: &mut MatchExecutor,
        order: &mut Order,
        limit: Option<Price>,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();
        let contra = order.side.opposite();

        while !order.is_filled() {
            let Some(best) = book.best_price(contra) else {
                break;
            };
            if let Some(limit) = limit {
                if !crossing::is_marketable(order.side, limit, best) {
                    break;
                }
            }
            // Defensive: a listed level always holds a live order
            let Some((maker_id, maker_remaining)) = book.front_of_level(contra, best) else {
                break;
            };

            let fill = order.remaining_quantity.min(maker_remaining);
            trades.push(executor.record_trade(
                order.symbol.clone(),
                maker_id,
                order.id.clone(),
                best,
                fill,
                order.side,
                order.timestamp,
            ));

            order.fill(fill);
            book.fill_front(contra, best, fill);
        }

        trades
    }

    /// Cancel a resting order on the symbol's book
    ///
    /// Returns false when the symbol has no book or the id is not resting.
    pub fn cancel_order(&mut self, symbol: &Symbol, id: &OrderId) -> bool {
        self.books
            .get_mut(symbol)
            .is_some_and(|book| book.cancel_order(id))
    }

    /// The book for a symbol, if one has been created
    pub fn book(&self, symbol: &Symbol) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// The book for a symbol, created empty on first reference
    pub fn book_mut(&mut self, symbol: &Symbol) -> &mut OrderBook {
        self.books
            .entry(symbol.clone())
            .or_insert_with_key(|symbol| OrderBook::new(symbol.clone()))
    }

    /// All trades emitted since construction (or the last clear)
    pub fn trades(&self) -> &[Trade] {
        &self.trade_history
    }

    /// Drop the accumulated history; the trade-id counter keeps running
    pub fn clear_trades(&mut self) {
        self.trade_history.clear();
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
