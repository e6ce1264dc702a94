use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};

use crate::{
    Item, ItemId, NewOrder, Order, OrderId, Result, StoreError,
    store::OrderStore,
};

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_item(row: &PgRow) -> Result<Item> {
        Ok(Item {
            item_id: ItemId::new(row.try_get("item_id")?),
            item_code: row.try_get("item_code")?,
            description: row.try_get("description")?,
            quantity: row.try_get("quantity")?,
            order_id: OrderId::new(row.try_get("order_id")?),
        })
    }

    fn row_to_order(row: &PgRow, items: Vec<Item>) -> Result<Order> {
        Ok(Order {
            order_id: OrderId::new(row.try_get("order_id")?),
            customer_name: row.try_get("customer_name")?,
            ordered_at: row.try_get("ordered_at")?,
            items,
        })
    }

    /// Loads one order and its items over a single connection.
    async fn fetch_order(conn: &mut PgConnection, order_id: OrderId) -> Result<Order> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT order_id, customer_name, ordered_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Err(StoreError::NotFound(order_id));
        };

        let item_rows = sqlx::query(
            r#"
            SELECT item_id, item_code, description, quantity, order_id
            FROM items
            WHERE order_id = $1
            ORDER BY item_id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&mut *conn)
        .await?;

        let items = item_rows
            .iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>>>()?;

        Self::row_to_order(&row, items)
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(items = order.items.len()))]
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (customer_name, ordered_at)
            VALUES ($1, $2)
            RETURNING order_id, customer_name, ordered_at
            "#,
        )
        .bind(&order.customer_name)
        .bind(order.ordered_at)
        .fetch_one(&mut *tx)
        .await?;
        let order_id = OrderId::new(row.try_get("order_id")?);

        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            let item_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO items (item_code, description, quantity, order_id)
                VALUES ($1, $2, $3, $4)
                RETURNING item_id
                "#,
            )
            .bind(&item.item_code)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(order_id.as_i64())
            .fetch_one(&mut *tx)
            .await?;

            items.push(item.into_item(ItemId::new(item_id), order_id));
        }

        let created = Self::row_to_order(&row, items)?;
        tx.commit().await?;
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let mut tx = self.pool.begin().await?;

        // Both reads must see the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let order_rows = sqlx::query(
            r#"
            SELECT order_id, customer_name, ordered_at
            FROM orders
            ORDER BY order_id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let item_rows = sqlx::query(
            r#"
            SELECT item_id, item_code, description, quantity, order_id
            FROM items
            ORDER BY item_id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut items_by_order: HashMap<OrderId, Vec<Item>> = HashMap::new();
        for row in &item_rows {
            let item = Self::row_to_item(row)?;
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        order_rows
            .iter()
            .map(|row| {
                let order_id = OrderId::new(row.try_get("order_id")?);
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                Self::row_to_order(row, items)
            })
            .collect()
    }

    async fn get(&self, order_id: OrderId) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        // Header and items must come from one snapshot, or a concurrent
        // save/delete can tear the aggregate.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let order = Self::fetch_order(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn save(&self, order: &Order) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE orders SET customer_name = $1 WHERE order_id = $2")
            .bind(&order.customer_name)
            .bind(order.order_id.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::NotFound(order.order_id));
        }

        for item in &order.items {
            let updated = sqlx::query(
                r#"
                UPDATE items
                SET item_code = $1, description = $2, quantity = $3
                WHERE item_id = $4 AND order_id = $5
                "#,
            )
            .bind(&item.item_code)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.item_id.as_i64())
            .bind(order.order_id.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            // Dropping the transaction rolls back the order row update.
            if updated == 0 {
                return Err(StoreError::foreign_item(order.order_id, item.item_id));
            }
        }

        let saved = Self::fetch_order(&mut tx, order.order_id).await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn delete(&self, order_id: OrderId) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id.as_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound(order_id));
        }
        Ok(())
    }
}
