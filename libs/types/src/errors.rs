//! Validation error taxonomy
//!
//! Errors here describe malformed ingress payloads, which are rejected at
//! the boundary and never reach the core. Core book and engine operations
//! are total on well-formed inputs; their precondition violations are
//! programmer errors and abort.

use thiserror::Error;

/// Rejection reasons for an inbound order record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(String),

    #[error("{order_type} order requires a price")]
    MissingPrice { order_type: String },
}
