//! Matching engine runner
//!
//! The thin glue around the core: pops orders from the Redis ingress queue,
//! feeds them to the engine one at a time, and publishes the resulting
//! trades plus the refreshed BBO and L2 views. The engine itself performs
//! no I/O; everything broker-shaped lives here.

mod codec;
mod config;

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use matching_engine::MatchingEngine;
use redis::aio::ConnectionManager;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::RunnerConfig;

const ORDER_QUEUE: &str = "order_queue";
const TRADE_EVENTS_CHANNEL: &str = "trade_events";
const BBO_CHANNEL: &str = "bbo_updates";
const ORDER_BOOK_CHANNEL: &str = "order_book_updates";

/// Levels per side in the published L2 snapshot
const L2_DEPTH: usize = 10;
/// Seconds BLPOP blocks before the loop re-checks for shutdown
const POP_TIMEOUT_SECS: usize = 1;
/// Pause after a broker error so a dead connection cannot spin the loop
const ERROR_BACKOFF: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RunnerConfig::from_env();
    info!(
        host = %config.redis_host,
        port = config.redis_port,
        db = config.redis_db,
        "engine runner starting"
    );

    let client = redis::Client::open(config.redis_url()).context("invalid redis url")?;
    let mut conn = client
        .get_connection_manager()
        .await
        .context("failed to connect to redis")?;
    redis::cmd("PING")
        .query_async::<()>(&mut conn)
        .await
        .context("redis ping failed")?;
    info!("redis connection established");

    let mut engine = MatchingEngine::new();
    let mut sigterm = signal(SignalKind::terminate()).context("failed to install sigterm handler")?;

    let mut orders_processed: u64 = 0;
    let mut trades_generated: u64 = 0;
    let started = Instant::now();

    info!(queue = ORDER_QUEUE, "listening for orders");
    loop {
        let payload = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = sigterm.recv() => break,
            popped = pop_order(&mut conn) => match popped {
                Ok(Some(payload)) => payload,
                // Poll timeout with an idle queue
                Ok(None) => continue,
                Err(err) => {
                    error!(error = %err, "queue read failed");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                    continue;
                }
            },
        };

        let order = match codec::decode_order(&payload) {
            Ok(order) => order,
            Err(err) => {
                warn!(error = %err, "dropping malformed order");
                continue;
            }
        };

        let symbol = order.symbol.clone();
        debug!(
            order_id = %order.id,
            symbol = %symbol,
            side = ?order.side,
            order_type = ?order.order_type,
            quantity = %order.quantity,
            "order received"
        );

        let trades = engine.process_order(order);
        orders_processed += 1;
        trades_generated += trades.len() as u64;

        for trade in &trades {
            publish_json(&mut conn, TRADE_EVENTS_CHANNEL, trade).await;
            info!(
                trade_id = %trade.trade_id,
                symbol = %trade.symbol,
                price = %trade.price,
                quantity = %trade.quantity,
                "trade published"
            );
        }

        // Market data reflects the book exactly as this order left it
        let now = unix_now();
        if let Some(book) = engine.book(&symbol) {
            publish_json(&mut conn, BBO_CHANNEL, &market_data::bbo(book, now)).await;
            publish_json(
                &mut conn,
                ORDER_BOOK_CHANNEL,
                &market_data::l2_update(book, L2_DEPTH, now),
            )
            .await;
        }

        if orders_processed % 100 == 0 {
            let elapsed = started.elapsed().as_secs();
            if elapsed > 0 {
                info!(
                    orders_processed,
                    trades_generated,
                    throughput_ops = orders_processed / elapsed,
                    "engine stats"
                );
            }
        }
    }

    info!(
        orders_processed,
        trades_generated,
        runtime_seconds = started.elapsed().as_secs(),
        "engine runner shut down"
    );
    Ok(())
}

/// Block for up to the pop timeout on the ingress queue
async fn pop_order(conn: &mut ConnectionManager) -> redis::RedisResult<Option<String>> {
    let popped: Option<(String, String)> = redis::cmd("BLPOP")
        .arg(ORDER_QUEUE)
        .arg(POP_TIMEOUT_SECS)
        .query_async(conn)
        .await?;
    Ok(popped.map(|(_queue, payload)| payload))
}

/// Publish a serializable record; failures are logged and skipped, since
/// market data is lossy between restarts by design
async fn publish_json<T: serde::Serialize>(conn: &mut ConnectionManager, channel: &str, record: &T) {
    let payload = match serde_json::to_string(record) {
        Ok(payload) => payload,
        Err(err) => {
            error!(error = %err, channel, "failed to serialize record");
            return;
        }
    };
    if let Err(err) = redis::cmd("PUBLISH")
        .arg(channel)
        .arg(payload)
        .query_async::<i64>(conn)
        .await
    {
        warn!(error = %err, channel, "publish failed");
    }
}

/// Wall-clock seconds for published market data; only the glue reads time
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
