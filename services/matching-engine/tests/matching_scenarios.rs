//! End-to-end matching scenarios over the public engine API
//!
//! Exercises the four order types against seeded books with literal prices
//! and quantities, and checks the structural book properties that must hold
//! after every processed order.

use matching_engine::{MatchingEngine, OrderBook};
use rust_decimal::Decimal;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::trade::Trade;

fn symbol() -> Symbol {
    Symbol::new("BTC-USDT")
}

fn qty(s: &str) -> Quantity {
    Quantity::from_str(s).unwrap()
}

fn price(p: u64) -> Price {
    Price::from_u64(p)
}

fn limit(id: &str, side: Side, p: u64, quantity: &str, ts: u64) -> Order {
    Order::limit(OrderId::new(id), symbol(), side, price(p), qty(quantity), ts)
}

fn market(id: &str, side: Side, quantity: &str, ts: u64) -> Order {
    Order::market(OrderId::new(id), symbol(), side, qty(quantity), ts)
}

/// Structural checks that must hold between any two processed orders:
/// uncrossed book, exact cached level totals, and live index entries.
fn assert_book_consistent(book: &OrderBook) {
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid < ask, "book is crossed: bid {bid} >= ask {ask}");
    }

    for side in [Side::Buy, Side::Sell] {
        let depth = match side {
            Side::Buy => book.depth_snapshot(usize::MAX).bids,
            Side::Sell => book.depth_snapshot(usize::MAX).asks,
        };
        for (level_price, level_total) in depth {
            let orders: Vec<_> = book
                .orders_at_price(side, level_price)
                .expect("listed level exists")
                .collect();
            assert!(!orders.is_empty(), "listed level has no live orders");

            let sum = orders
                .iter()
                .fold(Decimal::ZERO, |acc, o| acc + o.remaining_quantity.as_decimal());
            assert_eq!(
                sum,
                level_total.as_decimal(),
                "cached total out of sync at {level_price}"
            );

            for order in orders {
                assert!(!order.remaining_quantity.is_zero());
                assert_eq!(order.price, Some(level_price));
                assert_eq!(
                    book.resting_order(&order.id).map(|o| &o.id),
                    Some(&order.id),
                    "index does not resolve {}",
                    order.id
                );
            }
        }
    }
}

#[test]
fn test_market_buy_sweeps_two_ask_levels() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("ask1", Side::Sell, 60000, "0.5", 1000));
    engine.process_order(limit("ask2", Side::Sell, 60001, "1.0", 1001));

    let trades = engine.process_order(market("buy1", Side::Buy, "1.2", 1002));

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].price, price(60000));
    assert_eq!(trades[0].quantity, qty("0.5"));
    assert_eq!(trades[0].maker_order_id.as_str(), "ask1");
    assert_eq!(trades[1].price, price(60001));
    assert_eq!(trades[1].quantity, qty("0.7"));
    assert_eq!(trades[1].maker_order_id.as_str(), "ask2");

    let book = engine.book(&symbol()).unwrap();
    assert_eq!(book.total_quantity_at(Side::Sell, price(60000)), Quantity::zero());
    assert_eq!(book.total_quantity_at(Side::Sell, price(60001)), qty("0.3"));
    assert_eq!(book.best_bid(), None);
    assert_book_consistent(book);
}

#[test]
fn test_limit_buy_executes_at_maker_price() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("ask1", Side::Sell, 59990, "1.0", 1000));

    let trades = engine.process_order(limit("buy1", Side::Buy, 60000, "1.0", 1001));

    // Price improvement goes to the taker: execution at 59990, not 60000
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, price(59990));
    assert_eq!(trades[0].quantity, qty("1.0"));

    let book = engine.book(&symbol()).unwrap();
    assert!(book.is_empty());
    assert_book_consistent(book);
}

#[test]
fn test_non_marketable_limit_rests_and_sets_bbo() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("ask1", Side::Sell, 60001, "1.0", 1000));

    let trades = engine.process_order(limit("buy1", Side::Buy, 60000, "1.0", 1001));

    assert!(trades.is_empty());
    let book = engine.book(&symbol()).unwrap();
    assert_eq!(book.best_bid(), Some(price(60000)));
    assert_eq!(book.best_ask(), Some(price(60001)));
    assert_eq!(book.total_quantity_at(Side::Buy, price(60000)), qty("1.0"));
    assert_book_consistent(book);
}

#[test]
fn test_ioc_partial_fill_discards_residual() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("ask1", Side::Sell, 60000, "0.5", 1000));

    let ioc = Order::ioc(
        OrderId::new("buy1"),
        symbol(),
        Side::Buy,
        price(60000),
        qty("1.0"),
        1001,
    );
    let trades = engine.process_order(ioc);

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, qty("0.5"));

    let book = engine.book(&symbol()).unwrap();
    assert_eq!(book.best_ask(), None);
    assert_eq!(book.best_bid(), None);
    assert_book_consistent(book);
}

#[test]
fn test_infeasible_fok_is_an_atomic_noop() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("ask1", Side::Sell, 60000, "0.3", 1000));
    engine.process_order(limit("ask2", Side::Sell, 60001, "0.8", 1001));

    let fok = Order::fok(
        OrderId::new("buy1"),
        symbol(),
        Side::Buy,
        price(60000),
        qty("1.0"),
        1002,
    );
    let trades = engine.process_order(fok);

    assert!(trades.is_empty());
    let book = engine.book(&symbol()).unwrap();
    assert_eq!(book.total_quantity_at(Side::Sell, price(60000)), qty("0.3"));
    assert_eq!(book.total_quantity_at(Side::Sell, price(60001)), qty("0.8"));
    assert_eq!(book.order_count(), 2);
    assert_book_consistent(book);
}

#[test]
fn test_market_sell_consumes_level_in_arrival_order() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("b1", Side::Buy, 60000, "1.0", 1000));
    engine.process_order(limit("b2", Side::Buy, 60000, "2.0", 1001));
    engine.process_order(limit("b3", Side::Buy, 60000, "0.5", 1002));

    let trades = engine.process_order(market("sell1", Side::Sell, "2.5", 1003));

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].maker_order_id.as_str(), "b1");
    assert_eq!(trades[0].quantity, qty("1.0"));
    assert_eq!(trades[1].maker_order_id.as_str(), "b2");
    assert_eq!(trades[1].quantity, qty("1.5"));

    let book = engine.book(&symbol()).unwrap();
    assert_eq!(book.total_quantity_at(Side::Buy, price(60000)), qty("1.0"));
    let remaining: Vec<(String, Quantity)> = book
        .orders_at_price(Side::Buy, price(60000))
        .unwrap()
        .map(|o| (o.id.to_string(), o.remaining_quantity))
        .collect();
    assert_eq!(
        remaining,
        vec![("b2".to_string(), qty("0.5")), ("b3".to_string(), qty("0.5"))]
    );
    assert_book_consistent(book);
}

#[test]
fn test_market_and_ioc_against_empty_book_are_noops() {
    let mut engine = MatchingEngine::new();

    let trades = engine.process_order(market("m1", Side::Buy, "1.0", 1000));
    assert!(trades.is_empty());

    let ioc = Order::ioc(
        OrderId::new("i1"),
        symbol(),
        Side::Sell,
        price(60000),
        qty("1.0"),
        1001,
    );
    let trades = engine.process_order(ioc);
    assert!(trades.is_empty());

    let book = engine.book(&symbol()).unwrap();
    assert!(book.is_empty());
    assert_book_consistent(book);
}

#[test]
fn test_add_then_cancel_restores_book_exactly() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("b1", Side::Buy, 59999, "2.0", 1000));
    engine.process_order(limit("a1", Side::Sell, 60001, "1.5", 1001));

    let before = {
        let book = engine.book(&symbol()).unwrap();
        (
            book.best_bid(),
            book.best_ask(),
            book.depth_snapshot(10),
            book.order_count(),
        )
    };

    engine.process_order(limit("b2", Side::Buy, 60000, "1.0", 1002));
    assert!(engine.cancel_order(&symbol(), &OrderId::new("b2")));

    let book = engine.book(&symbol()).unwrap();
    assert_eq!(book.best_bid(), before.0);
    assert_eq!(book.best_ask(), before.1);
    assert_eq!(book.depth_snapshot(10), before.2);
    assert_eq!(book.order_count(), before.3);
    assert_book_consistent(book);
}

#[test]
fn test_matched_volume_is_conserved() {
    let mut engine = MatchingEngine::new();

    let orders = vec![
        limit("a1", Side::Sell, 60000, "0.5", 1000),
        limit("a2", Side::Sell, 60001, "1.0", 1001),
        limit("b1", Side::Buy, 59999, "0.8", 1002),
        limit("b2", Side::Buy, 60000, "0.9", 1003),
        market("m1", Side::Sell, "0.6", 1004),
        limit("b3", Side::Buy, 60002, "1.2", 1005),
    ];
    let submitted = orders.clone();

    for order in orders {
        engine.process_order(order);
        assert_book_consistent(engine.book(&symbol()).unwrap());
    }

    // Quantity each order gave up, read back from the trade tape
    let consumed = |id: &str| {
        engine
            .trades()
            .iter()
            .filter(|t| t.maker_order_id.as_str() == id || t.taker_order_id.as_str() == id)
            .fold(Decimal::ZERO, |acc, t| acc + t.quantity.as_decimal())
    };

    let book = engine.book(&symbol()).unwrap();
    let mut consumed_buy = Decimal::ZERO;
    let mut consumed_sell = Decimal::ZERO;
    for order in &submitted {
        let filled = consumed(order.id.as_str());
        let resting = book
            .resting_order(&order.id)
            .map_or(Decimal::ZERO, |o| o.remaining_quantity.as_decimal());

        // Nothing is created or lost per order; residuals of market/ioc
        // orders are discarded, everything else is filled or resting.
        assert!(filled + resting <= order.quantity.as_decimal());
        match order.order_type {
            OrderType::Limit => assert_eq!(filled + resting, order.quantity.as_decimal()),
            _ => assert_eq!(resting, Decimal::ZERO, "only limit orders rest"),
        }

        match order.side {
            Side::Buy => consumed_buy += filled,
            Side::Sell => consumed_sell += filled,
        }
    }

    // Each trade consumes equal quantity from exactly one buy and one sell
    let traded = engine
        .trades()
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc + t.quantity.as_decimal());
    assert_eq!(consumed_buy, traded);
    assert_eq!(consumed_sell, traded);
}

#[test]
fn test_emitted_trade_serializes_to_wire_shape() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("ask1", Side::Sell, 60000, "0.5", 1000));
    let trades = engine.process_order(market("buy1", Side::Buy, "0.5", 1001));
    assert_eq!(trades.len(), 1);

    let json = serde_json::to_value(&trades[0]).unwrap();
    assert_eq!(json["trade_id"], "T0001");
    assert_eq!(json["symbol"], "BTC-USDT");
    assert_eq!(json["maker_order_id"], "ask1");
    assert_eq!(json["taker_order_id"], "buy1");
    assert_eq!(json["price"], "60000");
    assert_eq!(json["quantity"], "0.5");
    assert_eq!(json["aggressor_side"], "buy");
    assert_eq!(json["timestamp"], 1001);

    let back: Trade = serde_json::from_str(&serde_json::to_string(&trades[0]).unwrap()).unwrap();
    assert_eq!(back, trades[0]);
}

#[test]
fn test_trade_ids_are_gapless_in_emission_order() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("a1", Side::Sell, 60000, "0.5", 1000));
    engine.process_order(limit("a2", Side::Sell, 60001, "1.0", 1001));
    engine.process_order(market("m1", Side::Buy, "1.2", 1002));
    engine.process_order(limit("b1", Side::Buy, 60001, "0.3", 1003));

    let ids: Vec<&str> = engine.trades().iter().map(|t| t.trade_id.as_str()).collect();
    assert_eq!(ids, vec!["T0001", "T0002", "T0003"]);
}

#[test]
fn test_sweep_prices_never_improve_for_the_taker() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("a1", Side::Sell, 60000, "0.2", 1000));
    engine.process_order(limit("a2", Side::Sell, 60002, "0.2", 1001));
    engine.process_order(limit("a3", Side::Sell, 60005, "0.2", 1002));

    let trades = engine.process_order(market("m1", Side::Buy, "0.6", 1003));

    assert_eq!(trades.len(), 3);
    for pair in trades.windows(2) {
        assert!(pair[0].price <= pair[1].price, "buy sweep must ascend");
    }
}

#[test]
fn test_cancelled_order_is_skipped_by_matching() {
    let mut engine = MatchingEngine::new();
    engine.process_order(limit("b1", Side::Buy, 60000, "1.0", 1000));
    engine.process_order(limit("b2", Side::Buy, 60000, "2.0", 1001));
    engine.process_order(limit("b3", Side::Buy, 60000, "0.5", 1002));

    assert!(engine.cancel_order(&symbol(), &OrderId::new("b2")));

    let trades = engine.process_order(market("s1", Side::Sell, "1.5", 1003));

    // b2 is gone; the sell takes b1 fully then b3
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].maker_order_id.as_str(), "b1");
    assert_eq!(trades[0].quantity, qty("1.0"));
    assert_eq!(trades[1].maker_order_id.as_str(), "b3");
    assert_eq!(trades[1].quantity, qty("0.5"));

    let book = engine.book(&symbol()).unwrap();
    assert!(book.is_empty());
    assert_book_consistent(book);
}
