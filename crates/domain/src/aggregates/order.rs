use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Shipping address captured on the order at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// Snapshot of the catalog item at the time it was ordered.
///
/// Later catalog edits (renames, new pictures) do not change past orders.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemOrdered {
    pub catalog_item_id: i32,
    pub product_name: String,
    pub picture_uri: String,
}

impl CatalogItemOrdered {
    pub fn new(
        catalog_item_id: i32,
        product_name: impl Into<String>,
        picture_uri: impl Into<String>,
    ) -> Self {
        Self {
            catalog_item_id,
            product_name: product_name.into(),
            picture_uri: picture_uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub item_ordered: CatalogItemOrdered,
    pub unit_price: f64,
    pub units: i32,
}

impl OrderItem {
    pub fn new(item_ordered: CatalogItemOrdered, unit_price: f64, units: i32) -> Self {
        Self {
            item_ordered,
            unit_price,
            units,
        }
    }

    pub fn total_price(&self) -> f64 {
        self.unit_price * self.units as f64
    }
}

/// A placed order. Read-only from the point of view of order history.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub buyer_id: String,
    pub order_date: DateTime<Utc>,
    pub ship_to_address: Address,
    pub order_items: Vec<OrderItem>,
}

impl Order {
    pub fn new(
        id: i32,
        buyer_id: impl Into<String>,
        order_date: DateTime<Utc>,
        ship_to_address: Address,
        order_items: Vec<OrderItem>,
    ) -> Result<Self, DomainError> {
        let buyer_id = buyer_id.into();
        if buyer_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "buyer id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            buyer_id,
            order_date,
            ship_to_address,
            order_items,
        })
    }

    /// Order total, summed over line items
    pub fn total(&self) -> f64 {
        self.order_items.iter().map(OrderItem::total_price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address::new("123 Main St.", "Kent", "OH", "United States", "44240")
    }

    #[test]
    fn test_order_total_sums_items() {
        let items = vec![
            OrderItem::new(CatalogItemOrdered::new(1, "Widget", "/images/1.png"), 10.0, 2),
            OrderItem::new(CatalogItemOrdered::new(2, "Gadget", "/images/2.png"), 1.5, 4),
        ];

        let order = Order::new(7, "buyer", Utc::now(), address(), items).unwrap();
        assert_eq!(order.total(), 26.0);
    }

    #[test]
    fn test_order_without_items_has_zero_total() {
        let order = Order::new(1, "buyer", Utc::now(), address(), vec![]).unwrap();
        assert_eq!(order.total(), 0.0);
    }

    #[test]
    fn test_order_requires_buyer_id() {
        let result = Order::new(1, "  ", Utc::now(), address(), vec![]);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_order_item_total_price() {
        let item = OrderItem::new(CatalogItemOrdered::new(1, "Widget", "uri"), 10.50, 3);
        assert_eq!(item.total_price(), 31.50);
    }

    #[test]
    fn test_address_serialization() {
        let json = serde_json::to_value(address()).unwrap();
        assert_eq!(json["zipCode"], "44240");
        assert_eq!(json["street"], "123 Main St.");
    }
}
