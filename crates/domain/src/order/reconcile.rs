//! Merging an update request into a loaded order.

use order_store::Order;

use super::ItemUpdate;

/// Outcome of merging item updates into an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Updates that found an item to rewrite.
    pub matched: usize,
    /// Updates whose id did not belong to the order and were dropped.
    pub skipped: usize,
}

/// Applies an update request to an order in place.
///
/// The customer name is always replaced. Each update then rewrites the code,
/// description and quantity of the first item whose id equals its
/// `line_item_id`; the item keeps its id, owner and position. Updates for ids
/// the order does not hold are dropped without error, so this never adds or
/// removes items. Updates run in input order, so when several target the same
/// item the last one wins.
pub fn reconcile(
    order: &mut Order,
    customer_name: String,
    updates: Vec<ItemUpdate>,
) -> ReconcileSummary {
    order.customer_name = customer_name;

    let mut summary = ReconcileSummary::default();
    for update in updates {
        match order
            .items
            .iter_mut()
            .find(|item| item.item_id == update.line_item_id)
        {
            Some(item) => {
                item.item_code = update.item_code;
                item.description = update.description;
                item.quantity = update.quantity;
                summary.matched += 1;
            }
            None => summary.skipped += 1,
        }
    }

    summary
}
