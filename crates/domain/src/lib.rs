//! Domain layer for the order service.
//!
//! This crate provides:
//! - Command records decoded from requests at the boundary
//! - The reconciliation step that merges an update into a loaded order
//! - An optional validation policy
//! - `OrderService`, which runs every operation against an injected store

pub mod error;
pub mod order;

pub use error::DomainError;
pub use order::{
    CreateOrder, ItemUpdate, OrderError, OrderService, ReconcileSummary, UpdateOrder,
    ValidationPolicy, reconcile,
};
pub use order_store::{Item, ItemId, NewItem, Order, OrderId};
