//! Ingress order codec
//!
//! Decodes the JSON order record pushed by the gateway and validates it
//! before it can reach the engine. Anything malformed is rejected here: the
//! core trusts its inputs and treats violations as programmer errors.

use serde::Deserialize;
use thiserror::Error;
use types::errors::OrderError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};

/// Wire shape of an inbound order
///
/// `price` is null (or absent) for market orders; `timestamp` defaults to
/// zero when the gateway omits it.
#[derive(Debug, Deserialize)]
struct OrderRequest {
    id: String,
    symbol: String,
    order_type: OrderType,
    side: Side,
    quantity: Quantity,
    #[serde(default)]
    price: Option<Price>,
    #[serde(default)]
    timestamp: u64,
}

/// Why an inbound payload was dropped
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed order payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] OrderError),
}

/// Decode and validate one queued order payload
pub fn decode_order(payload: &str) -> Result<Order, DecodeError> {
    let request: OrderRequest = serde_json::from_str(payload)?;

    if request.quantity.is_zero() {
        return Err(OrderError::InvalidQuantity(request.quantity.to_string()).into());
    }

    // Market orders ignore any supplied price; priced types require one
    let price = match request.order_type {
        OrderType::Market => None,
        order_type => Some(request.price.ok_or_else(|| OrderError::MissingPrice {
            order_type: format!("{order_type:?}").to_lowercase(),
        })?),
    };

    Ok(Order::new(
        OrderId::new(request.id),
        Symbol::new(request.symbol),
        request.side,
        request.order_type,
        price,
        request.quantity,
        request.timestamp,
    ))
}
