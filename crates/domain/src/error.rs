//! Domain error types.

use common::OrderId;
use order_store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No order exists with the requested id.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order was rejected by the validation policy.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// The store failed to complete the operation.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(order_id) => DomainError::OrderNotFound(order_id),
            other => DomainError::Store(other),
        }
    }
}
