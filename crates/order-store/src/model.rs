//! The order aggregate as it is loaded from and written to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, OrderId};

/// A persisted order together with every line item stored under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub customer_name: String,
    pub ordered_at: DateTime<Utc>,
    /// Line items in persistence order.
    pub items: Vec<Item>,
}

impl Order {
    /// Returns the first item carrying the given id, if any.
    pub fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A persisted line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: ItemId,
    pub item_code: String,
    pub description: String,
    pub quantity: i32,
    /// Owning order. Fixed when the item is created.
    pub order_id: OrderId,
}

/// An order that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub ordered_at: DateTime<Utc>,
    pub items: Vec<NewItem>,
}

impl NewOrder {
    /// Creates an order stamped with the current instant.
    pub fn new(customer_name: impl Into<String>, items: Vec<NewItem>) -> Self {
        Self {
            customer_name: customer_name.into(),
            ordered_at: Utc::now(),
            items,
        }
    }
}

/// A line item that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub item_code: String,
    pub description: String,
    pub quantity: i32,
}

impl NewItem {
    pub fn new(item_code: impl Into<String>, description: impl Into<String>, quantity: i32) -> Self {
        Self {
            item_code: item_code.into(),
            description: description.into(),
            quantity,
        }
    }

    /// Attaches the identities the store assigned on insert.
    pub fn into_item(self, item_id: ItemId, order_id: OrderId) -> Item {
        Item {
            item_id,
            item_code: self.item_code,
            description: self.description,
            quantity: self.quantity,
            order_id,
        }
    }
}
