use async_trait::async_trait;

use crate::{NewOrder, Order, OrderId, Result, StoreError};

/// Core trait for order store implementations.
///
/// Every operation reads or writes a whole aggregate: an order is always
/// returned with its items loaded, and writes cover the order row and its
/// items in one atomic unit. Implementations must be safe to share across
/// request tasks (Send + Sync); the store is the only place where
/// concurrent access to the same order is serialized.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order and all of its items atomically.
    ///
    /// Assigns the order id and one item id per item. Items in the returned
    /// order keep the input order.
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// Returns every stored order with its items.
    ///
    /// Orders come back in ascending id order and items in persistence order.
    async fn list_all(&self) -> Result<Vec<Order>>;

    /// Loads one order with its items.
    ///
    /// Fails with [`StoreError::NotFound`] if no order has this id.
    async fn get(&self, order_id: OrderId) -> Result<Order>;

    /// Writes a loaded order back over its stored record.
    ///
    /// Overwrites the customer name and the code, description and quantity
    /// of every item in `order.items`. Identities and `ordered_at` are never
    /// touched. Fails with [`StoreError::NotFound`] if the order has been
    /// deleted, or [`StoreError::ConstraintViolation`] if an item does not
    /// belong to the order.
    async fn save(&self, order: &Order) -> Result<Order>;

    /// Removes an order. Its items are removed with it.
    async fn delete(&self, order_id: OrderId) -> Result<()>;
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderStoreExt: OrderStore {
    /// Checks whether an order with this id exists.
    async fn exists(&self, order_id: OrderId) -> Result<bool> {
        match self.get(order_id).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

// Blanket implementation for all OrderStore implementations
impl<T: OrderStore + ?Sized> OrderStoreExt for T {}
