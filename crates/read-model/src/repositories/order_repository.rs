use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Address, CatalogItemOrdered, CustomerOrdersWithItemsSpecification, Order, OrderItem};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::debug;

use crate::ReadModelError;

#[cfg(test)]
use mockall::automock;

/// Tables backing [`PostgresOrderRepository`]
pub const ORDERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id SERIAL PRIMARY KEY,
    buyer_id TEXT NOT NULL,
    order_date TIMESTAMPTZ NOT NULL,
    ship_to_street TEXT NOT NULL,
    ship_to_city TEXT NOT NULL,
    ship_to_state TEXT NOT NULL,
    ship_to_country TEXT NOT NULL,
    ship_to_zip_code TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_buyer_id ON orders (buyer_id);

CREATE TABLE IF NOT EXISTS order_items (
    id SERIAL PRIMARY KEY,
    order_id INTEGER NOT NULL REFERENCES orders (id),
    catalog_item_id INTEGER NOT NULL,
    product_name TEXT NOT NULL,
    picture_uri TEXT NOT NULL,
    unit_price DOUBLE PRECISION NOT NULL,
    units INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items (order_id);
"#;

/// Read access to placed orders
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// List every order matching the specification, fully loaded
    async fn list(
        &self,
        spec: &CustomerOrdersWithItemsSpecification,
    ) -> Result<Vec<Order>, ReadModelError>;
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i32,
    buyer_id: String,
    order_date: DateTime<Utc>,
    ship_to_street: String,
    ship_to_city: String,
    ship_to_state: String,
    ship_to_country: String,
    ship_to_zip_code: String,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: i32,
    catalog_item_id: i32,
    product_name: String,
    picture_uri: String,
    unit_price: f64,
    units: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem::new(
            CatalogItemOrdered::new(row.catalog_item_id, row.product_name, row.picture_uri),
            row.unit_price,
            row.units,
        )
    }
}

/// Build aggregates from order rows and their item rows.
///
/// Orders keep the order of `rows`; items keep their order within each
/// order. Orders without item rows get an empty item list.
fn assemble_orders(
    rows: Vec<OrderRow>,
    item_rows: Vec<OrderItemRow>,
) -> Result<Vec<Order>, ReadModelError> {
    let mut items: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for row in item_rows {
        items.entry(row.order_id).or_default().push(row.into());
    }

    rows.into_iter()
        .map(|row| {
            let order_items = items.remove(&row.id).unwrap_or_default();
            let address = Address::new(
                row.ship_to_street,
                row.ship_to_city,
                row.ship_to_state,
                row.ship_to_country,
                row.ship_to_zip_code,
            );
            Order::new(row.id, row.buyer_id, row.order_date, address, order_items)
                .map_err(ReadModelError::from)
        })
        .collect()
}

/// PostgreSQL implementation of OrderRepository
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_item_rows(&self, order_ids: &[i32]) -> Result<Vec<OrderItemRow>, ReadModelError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT
                order_id, catalog_item_id, product_name, picture_uri,
                unit_price, units
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn list(
        &self,
        spec: &CustomerOrdersWithItemsSpecification,
    ) -> Result<Vec<Order>, ReadModelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                id, buyer_id, order_date,
                ship_to_street, ship_to_city, ship_to_state,
                ship_to_country, ship_to_zip_code
            FROM orders
            WHERE buyer_id = $1
            ORDER BY id
            "#,
        )
        .bind(&spec.buyer_id)
        .fetch_all(&self.pool)
        .await?;

        let item_rows = if spec.include_items && !rows.is_empty() {
            let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
            self.load_item_rows(&ids).await?
        } else {
            Vec::new()
        };

        debug!("Loaded {} orders for buyer: {}", rows.len(), spec.buyer_id);

        assemble_orders(rows, item_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order_row(id: i32) -> OrderRow {
        OrderRow {
            id,
            buyer_id: "alice".to_string(),
            order_date: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            ship_to_street: "123 Main St.".to_string(),
            ship_to_city: "Kent".to_string(),
            ship_to_state: "OH".to_string(),
            ship_to_country: "United States".to_string(),
            ship_to_zip_code: "44240".to_string(),
        }
    }

    fn item_row(order_id: i32, catalog_item_id: i32, unit_price: f64, units: i32) -> OrderItemRow {
        OrderItemRow {
            order_id,
            catalog_item_id,
            product_name: format!("Product {}", catalog_item_id),
            picture_uri: format!("/images/{}.png", catalog_item_id),
            unit_price,
            units,
        }
    }

    #[test]
    fn test_item_row_conversion() {
        let item: OrderItem = item_row(3, 1, 10.0, 2).into();
        assert_eq!(item.item_ordered.catalog_item_id, 1);
        assert_eq!(item.item_ordered.product_name, "Product 1");
        assert_eq!(item.item_ordered.picture_uri, "/images/1.png");
        assert_eq!(item.total_price(), 20.0);
    }

    #[test]
    fn test_assemble_groups_items_by_order() {
        let orders = assemble_orders(
            vec![order_row(2), order_row(5), order_row(9)],
            vec![
                item_row(2, 10, 1.0, 1),
                item_row(9, 30, 3.0, 1),
                item_row(2, 11, 2.0, 2),
            ],
        )
        .unwrap();

        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);

        let first: Vec<i32> = orders[0]
            .order_items
            .iter()
            .map(|i| i.item_ordered.catalog_item_id)
            .collect();
        assert_eq!(first, vec![10, 11]);
        assert_eq!(orders[0].total(), 5.0);

        assert!(orders[1].order_items.is_empty());
        assert_eq!(orders[2].order_items.len(), 1);
        assert_eq!(orders[2].order_items[0].item_ordered.catalog_item_id, 30);
    }

    #[test]
    fn test_assemble_copies_order_columns() {
        let orders = assemble_orders(vec![order_row(4)], vec![]).unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].buyer_id, "alice");
        assert_eq!(orders[0].ship_to_address.zip_code, "44240");
        assert_eq!(orders[0].ship_to_address.city, "Kent");
        assert_eq!(orders[0].order_date, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_assemble_ignores_items_of_unlisted_orders() {
        let orders = assemble_orders(vec![order_row(1)], vec![item_row(99, 1, 1.0, 1)]).unwrap();
        assert!(orders[0].order_items.is_empty());
    }

    #[test]
    fn test_assemble_rejects_row_without_buyer() {
        let mut row = order_row(1);
        row.buyer_id = String::new();

        let result = assemble_orders(vec![row], vec![]);
        assert!(matches!(result, Err(ReadModelError::InvalidRecord(_))));
    }

    #[test]
    fn test_assemble_empty() {
        assert!(assemble_orders(vec![], vec![]).unwrap().is_empty());
    }
}
