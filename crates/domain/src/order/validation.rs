//! Optional business checks on orders.

use order_store::{NewOrder, Order};

use super::OrderError;

/// Which checks to run before an order is written.
///
/// The default policy is permissive: empty names, empty item lists and
/// negative quantities are all accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub require_customer_name: bool,
    /// Only checked on create; updates cannot change the item count.
    pub require_items: bool,
    pub reject_negative_quantity: bool,
}

impl ValidationPolicy {
    /// Accepts everything.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Enables every check.
    pub fn strict() -> Self {
        Self {
            require_customer_name: true,
            require_items: true,
            reject_negative_quantity: true,
        }
    }

    /// Checks an order about to be created.
    pub fn check_new(&self, order: &NewOrder) -> Result<(), OrderError> {
        self.check_customer_name(&order.customer_name)?;
        if self.require_items && order.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        order
            .items
            .iter()
            .try_for_each(|item| self.check_quantity(&item.item_code, item.quantity))
    }

    /// Checks an order after an update has been merged into it.
    pub fn check_updated(&self, order: &Order) -> Result<(), OrderError> {
        self.check_customer_name(&order.customer_name)?;
        order
            .items
            .iter()
            .try_for_each(|item| self.check_quantity(&item.item_code, item.quantity))
    }

    fn check_customer_name(&self, name: &str) -> Result<(), OrderError> {
        if self.require_customer_name && name.trim().is_empty() {
            return Err(OrderError::EmptyCustomerName);
        }
        Ok(())
    }

    fn check_quantity(&self, item_code: &str, quantity: i32) -> Result<(), OrderError> {
        if self.reject_negative_quantity && quantity < 0 {
            return Err(OrderError::NegativeQuantity {
                item_code: item_code.to_string(),
                quantity,
            });
        }
        Ok(())
    }
}
