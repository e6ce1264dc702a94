//! Order commands, reconciliation and the service that runs them.

mod commands;
mod reconcile;
mod service;
mod validation;

pub use commands::{CreateOrder, ItemUpdate, UpdateOrder};
pub use reconcile::{ReconcileSummary, reconcile};
pub use service::OrderService;
pub use validation::ValidationPolicy;

use thiserror::Error;

/// Errors raised when an order breaks the active validation policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Customer name is empty.
    #[error("Customer name is required")]
    EmptyCustomerName,

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Invalid quantity.
    #[error("Invalid quantity for item {item_code}: {quantity} (must not be negative)")]
    NegativeQuantity { item_code: String, quantity: i32 },
}
