//! Persistence for order aggregates.
//!
//! An order owns an ordered list of line items and is always loaded and
//! written as a whole. The [`OrderStore`] trait is the seam between the
//! order service and the backing database; [`PostgresOrderStore`] is the
//! production implementation and [`InMemoryOrderStore`] backs tests and
//! database-less runs.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use common::{ItemId, OrderId};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use model::{Item, NewItem, NewOrder, Order};
pub use postgres::PostgresOrderStore;
pub use store::{OrderStore, OrderStoreExt};
