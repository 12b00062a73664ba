//! Restaurant and menu repository.

use std::collections::HashSet;

use wakalni_core::accounts::AccountQuery;
use wakalni_core::cart::NewCartItem;
use wakalni_core::catalog::{MenuItem, MenuItemDraft, Restaurant, RestaurantQuery};
use wakalni_core::{MenuItemId, Price, RestaurantAction, RestaurantId, SupplementId};

use super::{RepositoryError, Store};

/// Repository for restaurants and their menus.
pub struct CatalogRepository<'a> {
    store: &'a Store,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Restaurants open to consumers that match the browsing filter.
    pub async fn browse(&self, query: &RestaurantQuery) -> Vec<Restaurant> {
        let restaurants = self.store.restaurants.read().await;
        restaurants.iter().filter(|r| query.matches(r)).cloned().collect()
    }

    /// Every restaurant matching the management filter, any status.
    pub async fn search(&self, query: &AccountQuery) -> Vec<Restaurant> {
        let restaurants = self.store.restaurants.read().await;
        restaurants
            .iter()
            .filter(|r| query.matches_restaurant(r))
            .cloned()
            .collect()
    }

    /// All restaurants, any status.
    pub async fn all(&self) -> Vec<Restaurant> {
        self.store.restaurants.read().await.clone()
    }

    /// Get a restaurant by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no restaurant has this ID.
    pub async fn get(&self, id: &RestaurantId) -> Result<Restaurant, RepositoryError> {
        let restaurants = self.store.restaurants.read().await;
        restaurants
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("restaurant", id))
    }

    /// Get a restaurant that currently takes orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown restaurants and for
    /// those that are pending, suspended or rejected.
    pub async fn get_open(&self, id: &RestaurantId) -> Result<Restaurant, RepositoryError> {
        let restaurant = self.get(id).await?;
        if restaurant.status.accepts_orders() {
            Ok(restaurant)
        } else {
            Err(RepositoryError::not_found("restaurant", id))
        }
    }

    /// Menu of a restaurant, in fixture order.
    pub async fn menu(&self, restaurant_id: &RestaurantId) -> Vec<MenuItem> {
        let menu = self.store.menu.read().await;
        menu.iter()
            .filter(|item| &item.restaurant_id == restaurant_id)
            .cloned()
            .collect()
    }

    /// Get one dish of a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant has no such dish.
    pub async fn menu_item(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<MenuItem, RepositoryError> {
        let menu = self.store.menu.read().await;
        menu.iter()
            .find(|item| &item.restaurant_id == restaurant_id && &item.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("menu item", id))
    }

    /// Resolve a menu selection into a cart line, using server-side prices.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or closed restaurant or dish, and
    /// `Selection` when the dish is unavailable or a supplement is unknown.
    pub async fn select(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
        supplements: &[SupplementId],
    ) -> Result<NewCartItem, RepositoryError> {
        self.get_open(restaurant_id).await?;
        let item = self.menu_item(restaurant_id, id).await?;
        Ok(item.select(supplements)?)
    }

    /// Sum of the delivery fees of the distinct restaurants given.
    pub async fn delivery_fee<'r>(
        &self,
        restaurant_ids: impl IntoIterator<Item = &'r RestaurantId>,
    ) -> Price {
        let wanted: HashSet<&RestaurantId> = restaurant_ids.into_iter().collect();
        let restaurants = self.store.restaurants.read().await;
        restaurants
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .map(|r| r.delivery_fee)
            .sum()
    }

    /// Add a recipe to a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MenuItem` when the draft is invalid.
    pub async fn create_menu_item(
        &self,
        restaurant_id: &RestaurantId,
        draft: MenuItemDraft,
    ) -> Result<MenuItem, RepositoryError> {
        let id = MenuItemId::new(self.store.next_id("M-"));
        let item = draft.into_menu_item(id, restaurant_id.clone())?;
        self.store.menu.write().await.push(item.clone());
        Ok(item)
    }

    /// Flip a dish between available and unavailable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant has no such dish.
    pub async fn toggle_availability(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<bool, RepositoryError> {
        let mut menu = self.store.menu.write().await;
        let item = menu
            .iter_mut()
            .find(|item| &item.restaurant_id == restaurant_id && &item.id == id)
            .ok_or_else(|| RepositoryError::not_found("menu item", id))?;
        item.available = !item.available;
        Ok(item.available)
    }

    /// Remove a dish from a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant has no such dish.
    pub async fn delete_menu_item(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<(), RepositoryError> {
        let mut menu = self.store.menu.write().await;
        let before = menu.len();
        menu.retain(|item| !(&item.restaurant_id == restaurant_id && &item.id == id));
        if menu.len() == before {
            return Err(RepositoryError::not_found("menu item", id));
        }
        Ok(())
    }

    /// Apply a superadmin action to a restaurant.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown restaurant and `Transition` when the
    /// action is not offered for its current status.
    pub async fn apply_action(
        &self,
        id: &RestaurantId,
        action: RestaurantAction,
    ) -> Result<Restaurant, RepositoryError> {
        let mut restaurants = self.store.restaurants.write().await;
        let restaurant = restaurants
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| RepositoryError::not_found("restaurant", id))?;
        restaurant.status = restaurant.status.apply(action)?;
        Ok(restaurant.clone())
    }
}
