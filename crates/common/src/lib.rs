//! Shared identity types for the order service.

pub mod types;

pub use types::{ItemId, OrderId};
