//! Order commands.

use common::{ItemId, OrderId};
use order_store::NewItem;

/// Command to create a new order with its initial items.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// Name of the customer placing the order.
    pub customer_name: String,

    /// Items in the order they should be stored.
    pub items: Vec<NewItem>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command.
    pub fn new(customer_name: impl Into<String>, items: Vec<NewItem>) -> Self {
        Self {
            customer_name: customer_name.into(),
            items,
        }
    }
}

/// Command to replace an order's customer name and rewrite some of its items.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    /// The order to update.
    pub order_id: OrderId,

    /// New customer name. Always applied, even when empty.
    pub customer_name: String,

    /// Item rewrites, applied in order.
    pub items: Vec<ItemUpdate>,
}

impl UpdateOrder {
    /// Creates a new UpdateOrder command.
    pub fn new(order_id: OrderId, customer_name: impl Into<String>, items: Vec<ItemUpdate>) -> Self {
        Self {
            order_id,
            customer_name: customer_name.into(),
            items,
        }
    }
}

/// New field values for one existing line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    /// Id of the item to rewrite.
    pub line_item_id: ItemId,
    pub item_code: String,
    pub description: String,
    pub quantity: i32,
}

impl ItemUpdate {
    /// Creates a new ItemUpdate.
    pub fn new(
        line_item_id: ItemId,
        item_code: impl Into<String>,
        description: impl Into<String>,
        quantity: i32,
    ) -> Self {
        Self {
            line_item_id,
            item_code: item_code.into(),
            description: description.into(),
            quantity,
        }
    }
}
