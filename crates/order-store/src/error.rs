use thiserror::Error;

use crate::{ItemId, OrderId};

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A write was rejected by an integrity rule of the store.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The backing database could not complete the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// An item in a saved order is not one of the order's stored items.
    pub(crate) fn foreign_item(order_id: OrderId, item_id: ItemId) -> Self {
        StoreError::ConstraintViolation(format!(
            "item {item_id} does not belong to order {order_id}"
        ))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::ConstraintViolation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        StoreError::Unavailable(err)
    }
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
