//! Property tests for the cart merge and total laws.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use wakalni_core::cart::{Cart, NewCartItem, Supplement};
use wakalni_core::{MenuItemId, Price, RestaurantId, SupplementId};

const SUPPLEMENTS: [(&str, i64); 4] = [("cheese", 200), ("mushrooms", 180), ("olives", 150), ("sauce", 50)];

fn item(menu_item: u8, mask: u8) -> NewCartItem {
    let supplements = SUPPLEMENTS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, (id, price))| Supplement {
            id: SupplementId::new(*id),
            name: (*id).to_owned(),
            price: Price::from_dinars(*price),
        })
        .collect();

    NewCartItem {
        menu_item_id: MenuItemId::new(menu_item.to_string()),
        name: format!("Item {menu_item}"),
        price: Price::from_dinars(1000 + i64::from(menu_item) * 100),
        image: String::new(),
        restaurant_id: RestaurantId::new("1"),
        supplements,
    }
}

fn expected_unit(menu_item: u8, mask: u8) -> i64 {
    let extras: i64 = SUPPLEMENTS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, (_, price))| *price)
        .sum();
    1000 + i64::from(menu_item) * 100 + extras
}

proptest! {
    #[test]
    fn test_supplement_order_does_not_split_lines(mask in 0u8..16, a in 1u32..10, b in 1u32..10) {
        let mut cart = Cart::new();
        let forward = item(1, mask);
        let mut reversed = item(1, mask);
        reversed.supplements.reverse();

        cart.add_item(forward, a);
        cart.add_item(reversed, b);

        prop_assert_eq!(cart.items().len(), 1);
        prop_assert_eq!(cart.items()[0].quantity, a + b);
    }

    #[test]
    fn test_one_line_per_distinct_item_and_supplement_set(
        adds in prop::collection::vec((0u8..3, 0u8..16, 1u32..5), 1..30)
    ) {
        let mut cart = Cart::new();
        let mut distinct = std::collections::HashSet::new();
        for (menu_item, mask, quantity) in &adds {
            cart.add_item(item(*menu_item, *mask), *quantity);
            distinct.insert((*menu_item, *mask));
        }

        prop_assert_eq!(cart.items().len(), distinct.len());

        let total_quantity: u64 = adds.iter().map(|(_, _, q)| u64::from(*q)).sum();
        prop_assert_eq!(cart.total_items(), total_quantity);

        let expected: i64 = adds
            .iter()
            .map(|(m, mask, q)| expected_unit(*m, *mask) * i64::from(*q))
            .sum();
        prop_assert_eq!(cart.total_price(), Price::from_dinars(expected));
    }

    #[test]
    fn test_non_positive_update_removes_line(mask in 0u8..16, quantity in -5i64..=0) {
        let mut cart = Cart::new();
        let keep = cart.add_item(item(2, 0), 1);
        let drop = cart.add_item(item(1, mask), 3);

        cart.update_quantity(&drop, quantity);

        prop_assert!(cart.get(&drop).is_none());
        prop_assert!(cart.get(&keep).is_some());
        prop_assert_eq!(cart.total_price(), Price::from_dinars(expected_unit(2, 0)));
    }

    #[test]
    fn test_quantities_never_drop_below_one(
        ops in prop::collection::vec((0u8..2, 0u8..4, -3i64..6), 1..40)
    ) {
        let mut cart = Cart::new();
        for (menu_item, mask, quantity) in ops {
            if quantity > 0 {
                cart.add_item(item(menu_item, mask), u32::try_from(quantity).unwrap());
            } else {
                let id = item(menu_item, mask).line_id();
                cart.update_quantity(&id, quantity);
            }
        }
        prop_assert!(cart.items().iter().all(|line| line.quantity >= 1));
    }
}
