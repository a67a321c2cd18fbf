use chrono::{DateTime, Utc};
use domain::{Address, Order, OrderItem};
use serde::{Deserialize, Serialize};

/// Display-ready line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSummary {
    pub product_id: i32,
    pub product_name: String,
    pub picture_url: String,
    pub unit_price: f64,
    pub units: i32,
}

/// Display-ready order, the unit of the order history page.
///
/// This is also the cached payload shape, so a value read back from the
/// cache is indistinguishable from a freshly mapped one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_number: i32,
    pub order_date: DateTime<Utc>,
    pub shipping_address: Address,
    pub order_items: Vec<OrderItemSummary>,
    pub total: f64,
}

impl From<&OrderItem> for OrderItemSummary {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.item_ordered.catalog_item_id,
            product_name: item.item_ordered.product_name.clone(),
            picture_url: item.item_ordered.picture_uri.clone(),
            unit_price: item.unit_price,
            units: item.units,
        }
    }
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.id,
            order_date: order.order_date,
            shipping_address: order.ship_to_address.clone(),
            order_items: order.order_items.iter().map(OrderItemSummary::from).collect(),
            total: order.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::CatalogItemOrdered;

    fn order(id: i32, items: Vec<OrderItem>) -> Order {
        Order::new(
            id,
            "alice",
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            Address::new("1 Infinite Loop", "Cupertino", "CA", "US", "95014"),
            items,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_copies_order_fields() {
        let source = order(
            42,
            vec![OrderItem::new(
                CatalogItemOrdered::new(1, "Widget", "/images/widget.png"),
                10.0,
                2,
            )],
        );

        let summary = OrderSummary::from(&source);
        assert_eq!(summary.order_number, 42);
        assert_eq!(summary.order_date, source.order_date);
        assert_eq!(summary.shipping_address, source.ship_to_address);
        assert_eq!(summary.total, 20.0);
        assert_eq!(
            summary.order_items,
            vec![OrderItemSummary {
                product_id: 1,
                product_name: "Widget".to_string(),
                picture_url: "/images/widget.png".to_string(),
                unit_price: 10.0,
                units: 2,
            }]
        );
    }

    #[test]
    fn test_json_round_trip_with_and_without_items() {
        // Two-decimal prices spread over the range, most not exact in binary
        let mut cents = 1u32;
        let orders: Vec<Order> = (0..40)
            .map(|id| {
                let items = (0..id % 6)
                    .map(|n| {
                        cents = (cents * 7919 + 13) % 50_000;
                        OrderItem::new(
                            CatalogItemOrdered::new(n, format!("Item {}", n), "i.png"),
                            f64::from(cents) / 100.0,
                            n % 5 + 1,
                        )
                    })
                    .collect();
                order(id, items)
            })
            .collect();
        let summaries: Vec<OrderSummary> = orders.iter().map(OrderSummary::from).collect();
        assert!(summaries[0].order_items.is_empty());

        let bytes = serde_json::to_vec(&summaries).unwrap();
        let decoded: Vec<OrderSummary> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, summaries);
        for (decoded, source) in decoded.iter().zip(&orders) {
            assert_eq!(decoded.total.to_bits(), source.total().to_bits());
        }
    }

    #[test]
    fn test_json_keeps_awkward_prices_exact() {
        let source = order(
            3,
            vec![
                OrderItem::new(CatalogItemOrdered::new(1, "Mug", "m.png"), 29.21, 4),
                OrderItem::new(CatalogItemOrdered::new(2, "Hoodie", "h.png"), 119.1, 4),
                OrderItem::new(CatalogItemOrdered::new(3, "Cap", "c.png"), 88.08, 1),
                OrderItem::new(CatalogItemOrdered::new(4, "Sheet", "s.png"), 157.18, 2),
            ],
        );
        let summary = OrderSummary::from(&source);

        let decoded: OrderSummary =
            serde_json::from_str(&serde_json::to_string(&summary).unwrap()).unwrap();
        assert_eq!(decoded, summary);
        assert_eq!(decoded.total.to_bits(), source.total().to_bits());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(OrderSummary::from(&order(5, vec![]))).unwrap();
        assert_eq!(json["orderNumber"], 5);
        assert_eq!(json["total"], 0.0);
        assert!(json["orderItems"].as_array().unwrap().is_empty());
        assert_eq!(json["shippingAddress"]["city"], "Cupertino");
    }
}
