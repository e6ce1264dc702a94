use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    ItemId, NewOrder, Order, OrderId, Result, StoreError,
    store::OrderStore,
};

#[derive(Default)]
struct State {
    orders: BTreeMap<OrderId, Order>,
    last_order_id: i64,
    last_item_id: i64,
}

impl State {
    fn next_order_id(&mut self) -> OrderId {
        self.last_order_id += 1;
        OrderId::new(self.last_order_id)
    }

    fn next_item_id(&mut self) -> ItemId {
        self.last_item_id += 1;
        ItemId::new(self.last_item_id)
    }
}

/// In-memory order store implementation for testing.
///
/// Mirrors the PostgreSQL schema: ids come from two counters that start at 1
/// and never reuse a value, and deleting an order drops its items. Each
/// mutation holds the write lock for its whole duration, which makes it
/// atomic with respect to concurrent callers.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the number of stored items across all orders.
    pub async fn item_count(&self) -> usize {
        self.state
            .read()
            .await
            .orders
            .values()
            .map(Order::item_count)
            .sum()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;

        let order_id = state.next_order_id();
        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            let item_id = state.next_item_id();
            items.push(item.into_item(item_id, order_id));
        }

        let order = Order {
            order_id,
            customer_name: order.customer_name,
            ordered_at: order.ordered_at,
            items,
        };
        state.orders.insert(order_id, order.clone());

        Ok(order)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.values().cloned().collect())
    }

    async fn get(&self, order_id: OrderId) -> Result<Order> {
        let state = self.state.read().await;
        state
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::NotFound(order_id))
    }

    async fn save(&self, order: &Order) -> Result<Order> {
        let mut state = self.state.write().await;
        let stored = state
            .orders
            .get_mut(&order.order_id)
            .ok_or(StoreError::NotFound(order.order_id))?;

        // Validate every item before touching anything so a rejected save
        // leaves the stored order as it was.
        let mut slots = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let slot = stored
                .items
                .iter()
                .position(|stored_item| stored_item.item_id == item.item_id)
                .ok_or_else(|| StoreError::foreign_item(order.order_id, item.item_id))?;
            slots.push(slot);
        }

        stored.customer_name = order.customer_name.clone();
        for (item, slot) in order.items.iter().zip(slots) {
            let target = &mut stored.items[slot];
            target.item_code = item.item_code.clone();
            target.description = item.description.clone();
            target.quantity = item.quantity;
        }

        Ok(stored.clone())
    }

    async fn delete(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .orders
            .remove(&order_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(order_id))
    }
}
