//! Restaurant orders and checkout pricing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::contains_ignore_case;
use crate::promo::AppliedPromo;
use crate::types::{
    DeliveryMode, OrderId, OrderStatus, OrderType, PaymentMethod, Price, StatusTransitionError,
};

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Price,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderLine {
    #[must_use]
    pub fn total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An order on a restaurant's kitchen board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: Option<String>,
    pub items: Vec<OrderLine>,
    pub total: Price,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub created_at: DateTime<Utc>,
    /// Minutes until ready.
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub table_number: Option<String>,
}

impl Order {
    /// Move the order along its workflow.
    ///
    /// # Errors
    ///
    /// Returns a [`StatusTransitionError`] for moves the workflow forbids;
    /// the order is left untouched.
    pub fn set_status(&mut self, target: OrderStatus) -> Result<OrderStatus, StatusTransitionError> {
        self.status = self.status.transition_to(target)?;
        Ok(self.status)
    }

    /// Customer initials for the avatar fallback.
    #[must_use]
    pub fn customer_initials(&self) -> String {
        self.customer_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// "Just now", "1 minute ago", "12 minutes ago".
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    match minutes {
        i64::MIN..=0 => "Just now".to_owned(),
        1 => "1 minute ago".to_owned(),
        2..=59 => format!("{minutes} minutes ago"),
        _ => {
            let hours = minutes / 60;
            if hours == 1 {
                "1 hour ago".to_owned()
            } else if hours < 24 {
                format!("{hours} hours ago")
            } else {
                format!("{} days ago", hours / 24)
            }
        }
    }
}

/// Filters of the orders panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderFilter {
    /// Matches order id or customer name.
    #[serde(default)]
    pub q: Option<String>,
    /// Status wire value or `all`.
    #[serde(default)]
    pub status: Option<String>,
    /// Order type wire value or `all`.
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let text_ok = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .is_none_or(|q| {
                contains_ignore_case(order.id.as_str(), q)
                    || contains_ignore_case(&order.customer_name, q)
            });
        let status_ok = selected(self.status.as_deref()).is_none_or(|s| s == order.status.as_str());
        let type_ok =
            selected(self.order_type.as_deref()).is_none_or(|t| t == order.order_type.as_str());
        text_ok && status_ok && type_ok
    }

    /// Apply the filter, keeping input order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

fn selected(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "all")
}

/// Count of orders per kitchen status, for the panel header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn of<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut counts = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Preparing => counts.preparing += 1,
                OrderStatus::Ready => counts.ready += 1,
                OrderStatus::Completed => counts.completed += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    /// Orders still in the kitchen.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.pending + self.preparing + self.ready
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Price breakdown shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutQuote {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub discount: Price,
    pub total: Price,
}

impl CheckoutQuote {
    /// Price a cart for the chosen reception mode.
    ///
    /// `delivery_fee` is the restaurant's fee and only applies to deliveries;
    /// a free-delivery promo waives it.
    #[must_use]
    pub fn compute(
        cart: &Cart,
        mode: DeliveryMode,
        delivery_fee: Price,
        promo: Option<&AppliedPromo>,
    ) -> Self {
        let subtotal = cart.total_price();
        let waived = promo.is_some_and(AppliedPromo::waives_delivery);
        let delivery_fee = if mode == DeliveryMode::Delivery && !waived && !cart.is_empty() {
            delivery_fee
        } else {
            Price::ZERO
        };
        let discount = promo.map_or(Price::ZERO, |p| p.discount.min(subtotal));
        let total = (subtotal + delivery_fee).saturating_sub(discount);
        Self {
            subtotal,
            delivery_fee,
            discount,
            total,
        }
    }
}

/// Details collected on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub customer_name: String,
    pub customer_phone: String,
    pub address: Option<String>,
    pub mode: DeliveryMode,
    pub payment: PaymentMethod,
}

/// Build the order a checkout would send to the restaurant.
#[must_use]
pub fn order_from_cart(
    id: OrderId,
    cart: &Cart,
    details: &CheckoutDetails,
    quote: &CheckoutQuote,
    now: DateTime<Utc>,
) -> Order {
    let items = cart
        .items()
        .iter()
        .map(|line| OrderLine {
            id: line.menu_item_id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price(),
            notes: Some(line.supplement_names())
                .filter(|names| !names.is_empty())
                .map(|names| format!("With {names}")),
        })
        .collect();

    Order {
        id,
        customer_name: details.customer_name.clone(),
        customer_phone: details.customer_phone.clone(),
        customer_address: match details.mode {
            DeliveryMode::Delivery => details.address.clone(),
            DeliveryMode::Pickup => None,
        },
        items,
        total: quote.total,
        status: OrderStatus::Pending,
        order_type: details.mode.into(),
        created_at: now,
        estimated_minutes: Some(match details.mode {
            DeliveryMode::Delivery => 30,
            DeliveryMode::Pickup => 15,
        }),
        table_number: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::cart::{NewCartItem, Supplement};
    use crate::promo::PromotionKind;
    use crate::types::{MenuItemId, PromotionId, RestaurantId, SupplementId};

    fn order(id: &str, customer: &str, status: OrderStatus, order_type: OrderType) -> Order {
        Order {
            id: OrderId::new(id),
            customer_name: customer.to_owned(),
            customer_phone: "+213 555 123 456".to_owned(),
            customer_address: None,
            items: vec![OrderLine {
                id: "1".to_owned(),
                name: "Pizza Margherita".to_owned(),
                quantity: 2,
                price: Price::from_dinars(1200),
                notes: None,
            }],
            total: Price::from_dinars(2400),
            status,
            order_type,
            created_at: Utc::now(),
            estimated_minutes: None,
            table_number: None,
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            NewCartItem {
                menu_item_id: MenuItemId::new("1"),
                name: "Pizza Margherita".to_owned(),
                price: Price::from_dinars(1200),
                image: String::new(),
                restaurant_id: RestaurantId::new("1"),
                supplements: vec![Supplement {
                    id: SupplementId::new("cheese"),
                    name: "Extra Cheese".to_owned(),
                    price: Price::from_dinars(200),
                }],
            },
            2,
        );
        cart
    }

    fn promo(kind: PromotionKind, discount: i64) -> AppliedPromo {
        AppliedPromo {
            promotion_id: PromotionId::new("1"),
            code: "CODE".to_owned(),
            kind,
            discount: Price::from_dinars(discount),
        }
    }

    #[test]
    fn test_set_status_leaves_order_untouched_on_error() {
        let mut order = order("ORD-1", "Sarah", OrderStatus::Completed, OrderType::Takeout);
        assert!(order.set_status(OrderStatus::Cancelled).is_err());
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn test_filter() {
        let orders = [
            order("ORD-1247", "Sarah Johnson", OrderStatus::Preparing, OrderType::Delivery),
            order("ORD-1246", "Mike Chen", OrderStatus::Ready, OrderType::Takeout),
            order("ORD-1245", "Emma Davis", OrderStatus::Completed, OrderType::DineIn),
        ];

        let by_name = OrderFilter {
            q: Some("mike".to_owned()),
            ..OrderFilter::default()
        };
        assert_eq!(by_name.apply(&orders).len(), 1);

        let by_id = OrderFilter {
            q: Some("ord-124".to_owned()),
            status: Some("all".to_owned()),
            order_type: Some("dine-in".to_owned()),
        };
        let found = by_id.apply(&orders);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "ORD-1245");
    }

    #[test]
    fn test_status_counts() {
        let orders = [
            order("1", "A", OrderStatus::Pending, OrderType::Delivery),
            order("2", "B", OrderStatus::Preparing, OrderType::Delivery),
            order("3", "C", OrderStatus::Completed, OrderType::Delivery),
        ];
        let counts = StatusCounts::of(&orders);
        assert_eq!(counts.active(), 2);
        assert_eq!(counts.completed, 1);
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(12), now), "12 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5 hours ago");
    }

    #[test]
    fn test_initials() {
        let order = order("1", "Sarah Johnson", OrderStatus::Pending, OrderType::Delivery);
        assert_eq!(order.customer_initials(), "SJ");
    }

    #[test]
    fn test_quote_delivery_fee_only_for_delivery() {
        let cart = cart();
        let fee = Price::from_dinars(150);

        let delivery = CheckoutQuote::compute(&cart, DeliveryMode::Delivery, fee, None);
        assert_eq!(delivery.subtotal, Price::from_dinars(2800));
        assert_eq!(delivery.total, Price::from_dinars(2950));

        let pickup = CheckoutQuote::compute(&cart, DeliveryMode::Pickup, fee, None);
        assert_eq!(pickup.total, Price::from_dinars(2800));
    }

    #[test]
    fn test_quote_applies_promo() {
        let cart = cart();
        let fee = Price::from_dinars(150);

        let percent = promo(PromotionKind::Percentage, 560);
        let quote = CheckoutQuote::compute(&cart, DeliveryMode::Delivery, fee, Some(&percent));
        assert_eq!(quote.discount, Price::from_dinars(560));
        assert_eq!(quote.total, Price::from_dinars(2390));

        let free = promo(PromotionKind::FreeDelivery, 0);
        let quote = CheckoutQuote::compute(&cart, DeliveryMode::Delivery, fee, Some(&free));
        assert_eq!(quote.delivery_fee, Price::ZERO);
        assert_eq!(quote.total, Price::from_dinars(2800));
    }

    #[test]
    fn test_order_from_cart() {
        let cart = cart();
        let details = CheckoutDetails {
            customer_name: "Amina".to_owned(),
            customer_phone: "+213 555 987 654".to_owned(),
            address: Some("Rue Didouche Mourad, Alger".to_owned()),
            mode: DeliveryMode::Pickup,
            payment: PaymentMethod::Card,
        };
        let quote = CheckoutQuote::compute(&cart, details.mode, Price::ZERO, None);
        let order = order_from_cart(OrderId::new("ORD-2000"), &cart, &details, &quote, Utc::now());

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_type, OrderType::Takeout);
        assert_eq!(order.customer_address, None);
        assert_eq!(order.items[0].price, Price::from_dinars(1400));
        assert_eq!(order.items[0].notes.as_deref(), Some("With Extra Cheese"));
        assert_eq!(order.total, Price::from_dinars(2800));
    }
}
