//! Restaurants and their menus.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{NewCartItem, Supplement, is_line_id_safe};
use crate::types::{MenuItemId, Price, RestaurantId, RestaurantStatus, SupplementId};

/// A restaurant on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub owner: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Business category used by the superadmin ("Fast Food", "Cafe").
    pub category: String,
    /// Consumer-facing cuisine label ("Pizza • Italian").
    pub cuisine: String,
    pub image: String,
    pub rating: f32,
    /// Display label such as "25-35 min".
    pub delivery_time: String,
    pub delivery_fee: Price,
    #[serde(default)]
    pub description: String,
    pub status: RestaurantStatus,
    pub registration_date: NaiveDate,
    pub revenue: Price,
    pub orders: u32,
}

impl Restaurant {
    #[must_use]
    pub fn has_free_delivery(&self) -> bool {
        !self.delivery_fee.is_positive()
    }
}

/// Consumer browsing filter: name search plus a cuisine chip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RestaurantQuery {
    #[serde(default)]
    pub q: Option<String>,
    /// Cuisine chip id (`pizza`, `grill`, ...); `all` or absent matches everything.
    #[serde(default)]
    pub category: Option<String>,
}

impl RestaurantQuery {
    /// Whether a restaurant should be listed to consumers.
    #[must_use]
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if !restaurant.status.accepts_orders() {
            return false;
        }
        let name_ok = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .is_none_or(|q| contains_ignore_case(&restaurant.name, q));
        let category_ok = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
            .is_none_or(|c| contains_ignore_case(&restaurant.cuisine, c));
        name_ok && category_ok
    }
}

/// Case-insensitive substring test used by every search box.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub category: String,
    pub available: bool,
    #[serde(default)]
    pub prep_minutes: u32,
    #[serde(default)]
    pub supplements: Vec<Supplement>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// Errors raised while turning a menu selection into a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{0} is currently unavailable")]
    Unavailable(String),
    #[error("unknown supplement '{0}'")]
    UnknownSupplement(String),
}

impl MenuItem {
    /// Build the cart input for this item with the chosen supplements.
    ///
    /// # Errors
    ///
    /// Returns an error when the item is unavailable or a supplement id is
    /// not offered for this item.
    pub fn select(&self, supplement_ids: &[SupplementId]) -> Result<NewCartItem, SelectionError> {
        if !self.available {
            return Err(SelectionError::Unavailable(self.name.clone()));
        }

        let supplements = supplement_ids
            .iter()
            .map(|id| {
                self.supplements
                    .iter()
                    .find(|s| &s.id == id)
                    .cloned()
                    .ok_or_else(|| SelectionError::UnknownSupplement(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewCartItem {
            menu_item_id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            restaurant_id: self.restaurant_id.clone(),
            supplements,
        })
    }

    /// First id of this item or its supplements that cannot be part of a
    /// line id, if any.
    #[must_use]
    pub fn unsafe_line_id(&self) -> Option<&str> {
        std::iter::once(self.id.as_str())
            .chain(self.supplements.iter().map(|s| s.id.as_str()))
            .find(|id| !is_line_id_safe(id))
    }
}

/// Group menu items by category, keeping first-seen category order.
#[must_use]
pub fn group_by_category<'a>(items: impl IntoIterator<Item = &'a MenuItem>) -> Vec<(String, Vec<&'a MenuItem>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<&'a MenuItem>> = BTreeMap::new();
    for item in items {
        if !groups.contains_key(&item.category) {
            order.push(item.category.clone());
        }
        groups.entry(item.category.clone()).or_default().push(item);
    }
    order
        .into_iter()
        .filter_map(|category| groups.remove(&category).map(|items| (category, items)))
        .collect()
}

/// Admin input for a new recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemDraft {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Option<Price>,
    pub prep_minutes: Option<u32>,
    pub ingredients: Vec<Ingredient>,
}

/// Errors from creating a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuItemDraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("price cannot be negative")]
    NegativePrice,
}

impl MenuItemDraft {
    /// Validate and build a new, available menu item.
    ///
    /// # Errors
    ///
    /// Returns an error when name or category is blank or the price is negative.
    pub fn into_menu_item(
        self,
        id: MenuItemId,
        restaurant_id: RestaurantId,
    ) -> Result<MenuItem, MenuItemDraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MenuItemDraftError::MissingField("name"));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(MenuItemDraftError::MissingField("category"));
        }
        let price = self.price.unwrap_or(Price::ZERO);
        if price < Price::ZERO {
            return Err(MenuItemDraftError::NegativePrice);
        }

        Ok(MenuItem {
            id,
            restaurant_id,
            name: name.to_owned(),
            description: self.description.trim().to_owned(),
            price,
            image: String::new(),
            category: category.to_owned(),
            available: true,
            prep_minutes: self.prep_minutes.unwrap_or(0),
            supplements: Vec::new(),
            ingredients: self.ingredients,
        })
    }
}
