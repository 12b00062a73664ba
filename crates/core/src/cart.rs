//! Session cart store.
//!
//! A cart is an ordered list of lines. Each line is a menu item together
//! with a set of supplements; two additions of the same item with the same
//! supplement set (in any order) land on the same line.
//!
//! All operations are total: unknown line ids and zero quantities are
//! silently ignored, and a line never holds a quantity below one.

use serde::{Deserialize, Serialize};

use crate::types::{LineId, MenuItemId, Price, RestaurantId, SupplementId};

/// Characters that join the parts of a line id.
///
/// Menu item and supplement ids must not contain them, or two different
/// selections could synthesize the same line id.
pub const LINE_ID_SEPARATORS: [char; 2] = ['_', ','];

/// Whether `id` can be part of a line id without ambiguity.
#[must_use]
pub fn is_line_id_safe(id: &str) -> bool {
    !id.is_empty() && !id.contains(LINE_ID_SEPARATORS)
}

/// An optional extra (cheese, olives, ...) attached to a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplement {
    pub id: SupplementId,
    pub name: String,
    pub price: Price,
}

/// What the menu page submits when the customer presses "add to cart".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub restaurant_id: RestaurantId,
    pub supplements: Vec<Supplement>,
}

impl NewCartItem {
    /// Synthesized line id: `<menu item id>_<sorted supplement ids>`.
    ///
    /// An item with no supplements gets a trailing underscore (`"1_"`).
    #[must_use]
    pub fn line_id(&self) -> LineId {
        line_id_for(&self.menu_item_id, &self.supplements)
    }
}

fn line_id_for(menu_item_id: &MenuItemId, supplements: &[Supplement]) -> LineId {
    let mut ids: Vec<&str> = supplements.iter().map(|s| s.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    LineId::new(format!("{menu_item_id}_{}", ids.join(",")))
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: LineId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    /// Base price of the menu item, without supplements.
    pub price: Price,
    pub quantity: u32,
    pub image: String,
    pub restaurant_id: RestaurantId,
    /// Sorted by supplement id.
    pub supplements: Vec<Supplement>,
}

impl CartItem {
    /// Base price plus every supplement.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.price + self.supplements.iter().map(|s| s.price).sum::<Price>()
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }

    /// Comma-separated supplement names, for display.
    #[must_use]
    pub fn supplement_names(&self) -> String {
        self.supplements
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The cart held in a visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &LineId) -> Option<&CartItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Add `quantity` units of `item`, merging into the matching line.
    ///
    /// Returns the id of the line that now holds the item. A zero quantity
    /// changes nothing.
    pub fn add_item(&mut self, item: NewCartItem, quantity: u32) -> LineId {
        let id = item.line_id();
        if quantity == 0 {
            return id;
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return id;
        }

        let mut supplements = item.supplements;
        supplements.sort_by(|a, b| a.id.cmp(&b.id));
        supplements.dedup_by(|a, b| a.id == b.id);

        self.items.push(CartItem {
            id: id.clone(),
            menu_item_id: item.menu_item_id,
            name: item.name,
            price: item.price,
            quantity,
            image: item.image,
            restaurant_id: item.restaurant_id,
            supplements,
        });
        id
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &LineId) {
        self.items.retain(|line| &line.id != id);
    }

    /// Set a line's quantity; zero or negative removes the line.
    pub fn update_quantity(&mut self, id: &LineId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| &line.id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `(price + supplements) * quantity` across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn supplement(id: &str, price: i64) -> Supplement {
        Supplement {
            id: SupplementId::new(id),
            name: id.to_owned(),
            price: Price::from_dinars(price),
        }
    }

    fn margherita(supplements: Vec<Supplement>) -> NewCartItem {
        NewCartItem {
            menu_item_id: MenuItemId::new("1"),
            name: "Pizza Margherita".to_owned(),
            price: Price::from_dinars(1200),
            image: "/static/images/margherita.jpg".to_owned(),
            restaurant_id: RestaurantId::new("1"),
            supplements,
        }
    }

    #[test]
    fn test_line_id_safe_ids() {
        assert!(is_line_id_safe("12"));
        assert!(is_line_id_safe("M-1248"));
        assert!(!is_line_id_safe("a,b"));
        assert!(!is_line_id_safe("cheese_extra"));
        assert!(!is_line_id_safe(""));
    }

    #[test]
    fn test_line_id_without_supplements_has_trailing_underscore() {
        assert_eq!(margherita(vec![]).line_id().as_str(), "1_");
    }

    #[test]
    fn test_line_id_sorts_supplements() {
        let item = margherita(vec![supplement("olives", 150), supplement("cheese", 200)]);
        assert_eq!(item.line_id().as_str(), "1_cheese,olives");
    }

    #[test]
    fn test_same_supplements_any_order_merge() {
        let mut cart = Cart::new();
        cart.add_item(
            margherita(vec![supplement("cheese", 200), supplement("olives", 150)]),
            1,
        );
        cart.add_item(
            margherita(vec![supplement("olives", 150), supplement("cheese", 200)]),
            2,
        );

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_different_supplements_get_separate_lines() {
        let mut cart = Cart::new();
        cart.add_item(margherita(vec![]), 1);
        cart.add_item(margherita(vec![supplement("cheese", 200)]), 1);
        cart.add_item(margherita(vec![supplement("olives", 150)]), 1);

        assert_eq!(cart.items().len(), 3);
    }

    #[test]
    fn test_total_price_includes_supplements() {
        let mut cart = Cart::new();
        cart.add_item(margherita(vec![supplement("cheese", 200)]), 2);
        assert_eq!(cart.total_price(), Price::from_dinars(2800));
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        let plain = cart.add_item(margherita(vec![]), 1);
        let cheesy = cart.add_item(margherita(vec![supplement("cheese", 200)]), 1);

        cart.update_quantity(&plain, 0);
        assert!(cart.get(&plain).is_none());
        assert_eq!(cart.total_price(), Price::from_dinars(1400));

        cart.update_quantity(&cheesy, -3);
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        let id = cart.add_item(margherita(vec![]), 1);
        cart.update_quantity(&id, 5);
        assert_eq!(cart.get(&id).unwrap().quantity, 5);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(margherita(vec![]), 2);
        let before = cart.clone();

        cart.remove_item(&LineId::new("99_"));
        cart.update_quantity(&LineId::new("99_"), 4);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(margherita(vec![]), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(margherita(vec![]), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_session_round_trip_keeps_lines() {
        let mut cart = Cart::new();
        cart.add_item(margherita(vec![supplement("olives", 150)]), 2);

        let json = serde_json::to_value(&cart).unwrap();
        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.items()[0].supplement_names(), "olives");
    }
}
