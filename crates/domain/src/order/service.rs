//! Order service running create, list, update and delete against a store.

use common::OrderId;
use order_store::{NewOrder, Order, OrderStore, OrderStoreExt};

use crate::error::DomainError;

use super::{CreateOrder, UpdateOrder, ValidationPolicy, reconcile};

/// Service for managing orders.
///
/// Owns the store handle it was constructed with and keeps no other state
/// between calls. Concurrency control is left to the store: two updates of
/// the same order race and the last save to commit wins.
pub struct OrderService<S: OrderStore> {
    store: S,
    policy: ValidationPolicy,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service with the permissive validation policy.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, ValidationPolicy::permissive())
    }

    /// Creates a new order service with an explicit validation policy.
    pub fn with_policy(store: S, policy: ValidationPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an order and its items in one write.
    ///
    /// The order is stamped with the current instant and keeps the input
    /// item order.
    #[tracing::instrument(skip(self, cmd), fields(items = cmd.items.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        let new_order = NewOrder::new(cmd.customer_name, cmd.items);
        self.policy.check_new(&new_order)?;

        let order = self.store.create(new_order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.order_id, "order created");
        Ok(order)
    }

    /// Lists every order with its items, in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list_all().await?)
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        Ok(self.store.get(order_id).await?)
    }

    /// Merges an update request into the stored order and saves it.
    ///
    /// See [`reconcile`] for the merge rules. Item updates that name an id
    /// the order does not hold are dropped silently.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn update_order(&self, cmd: UpdateOrder) -> Result<Order, DomainError> {
        let mut order = self.store.get(cmd.order_id).await?;

        let summary = reconcile(&mut order, cmd.customer_name, cmd.items);
        if summary.skipped > 0 {
            metrics::counter!("order_update_specs_skipped_total").increment(summary.skipped as u64);
        }
        tracing::debug!(
            matched = summary.matched,
            skipped = summary.skipped,
            "reconciled item updates"
        );

        self.policy.check_updated(&order)?;
        let order = self.store.save(&order).await?;

        metrics::counter!("orders_updated_total").increment(1);
        Ok(order)
    }

    /// Deletes an order. Its items go with it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), DomainError> {
        // A missing order reports NotFound without issuing a delete.
        if !self.store.exists(order_id).await? {
            return Err(DomainError::OrderNotFound(order_id));
        }
        self.store.delete(order_id).await?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(%order_id, "order deleted");
        Ok(())
    }
}
