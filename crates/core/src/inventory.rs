//! Ingredient stock for a restaurant.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::contains_ignore_case;
use crate::types::{InventoryItemId, Price};

/// Where a stock quantity sits between its min and max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Low,
    Normal,
    High,
}

impl StockLevel {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Stock",
            Self::Normal => "Normal",
            Self::High => "High Stock",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// An ingredient tracked in the stock room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    pub category: String,
    pub current_stock: Decimal,
    pub unit: String,
    pub min_stock: Decimal,
    pub max_stock: Decimal,
    pub cost_per_unit: Price,
    #[serde(default)]
    pub supplier: String,
    pub last_updated: NaiveDate,
}

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockChangeKind {
    Add,
    Remove,
}

/// A manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockChange {
    #[serde(rename = "type")]
    pub kind: StockChangeKind,
    pub quantity: Decimal,
}

/// Largest stock quantity an item may hold or a form may submit.
pub const MAX_STOCK: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors from inventory edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("stock cannot exceed {max}", max = MAX_STOCK)]
    QuantityTooLarge,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

impl InventoryItem {
    /// Low at or below min; high at 80% of max or more.
    #[must_use]
    pub fn stock_level(&self) -> StockLevel {
        if self.current_stock <= self.min_stock {
            StockLevel::Low
        } else if self.current_stock >= self.max_stock.saturating_mul(Decimal::new(8, 1)) {
            StockLevel::High
        } else {
            StockLevel::Normal
        }
    }

    /// Fill ratio against max stock, 0 to 100, for the progress bar.
    #[must_use]
    pub fn fill_percent(&self) -> u32 {
        if self.max_stock <= Decimal::ZERO {
            return 0;
        }
        let percent = (self.current_stock.saturating_mul(Decimal::ONE_HUNDRED) / self.max_stock)
            .round()
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        percent.to_u32().unwrap_or(100)
    }

    /// Value of the stock on hand.
    #[must_use]
    pub fn value(&self) -> Price {
        Price::new(self.current_stock.saturating_mul(self.cost_per_unit.amount())).round()
    }

    /// Apply a manual adjustment; removals saturate at zero.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NonPositiveQuantity`] unless the quantity is
    /// strictly positive and [`InventoryError::QuantityTooLarge`] when an
    /// addition would pass [`MAX_STOCK`]; the item is left untouched.
    pub fn apply(&mut self, change: StockChange, today: NaiveDate) -> Result<Decimal, InventoryError> {
        if change.quantity <= Decimal::ZERO {
            return Err(InventoryError::NonPositiveQuantity);
        }
        if change.quantity > MAX_STOCK {
            return Err(InventoryError::QuantityTooLarge);
        }
        self.current_stock = match change.kind {
            StockChangeKind::Add => {
                let stock = self.current_stock.saturating_add(change.quantity);
                if stock > MAX_STOCK {
                    return Err(InventoryError::QuantityTooLarge);
                }
                stock
            }
            StockChangeKind::Remove => (self.current_stock - change.quantity).max(Decimal::ZERO),
        };
        self.last_updated = today;
        Ok(self.current_stock)
    }
}

/// Total value of all stock.
#[must_use]
pub fn total_value<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Price {
    items.into_iter().map(InventoryItem::value).sum()
}

/// Number of items at or below their minimum.
#[must_use]
pub fn low_stock_count<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> usize {
    items
        .into_iter()
        .filter(|item| item.stock_level() == StockLevel::Low)
        .count()
}

/// Search box and category dropdown of the inventory tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InventoryFilter {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl InventoryFilter {
    #[must_use]
    pub fn matches(&self, item: &InventoryItem) -> bool {
        let text_ok = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .is_none_or(|q| contains_ignore_case(&item.name, q));
        let category_ok = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
            .is_none_or(|c| c == item.category);
        text_ok && category_ok
    }
}

/// Admin input for a new stock item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryDraft {
    pub name: String,
    pub category: String,
    pub current_stock: Option<Decimal>,
    pub unit: Option<String>,
    pub min_stock: Option<Decimal>,
    pub max_stock: Option<Decimal>,
    pub cost_per_unit: Option<Price>,
    pub supplier: String,
}

impl InventoryDraft {
    /// Validate and build the item. Missing numbers default to zero and the
    /// unit to `kg`.
    ///
    /// # Errors
    ///
    /// Returns an error when name or category is blank, a number is negative,
    /// a stock figure passes [`MAX_STOCK`] or the cost passes [`Price::MAX`].
    pub fn into_item(self, id: InventoryItemId, today: NaiveDate) -> Result<InventoryItem, InventoryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InventoryError::MissingField("name"));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(InventoryError::MissingField("category"));
        }

        let current_stock = non_negative(self.current_stock, "current stock")?;
        let min_stock = non_negative(self.min_stock, "min stock")?;
        let max_stock = non_negative(self.max_stock, "max stock")?;
        let cost_per_unit = self.cost_per_unit.unwrap_or(Price::ZERO);
        if cost_per_unit < Price::ZERO {
            return Err(InventoryError::Negative("cost per unit"));
        }
        if !cost_per_unit.is_within_limit() {
            return Err(InventoryError::QuantityTooLarge);
        }

        Ok(InventoryItem {
            id,
            name: name.to_owned(),
            category: category.to_owned(),
            current_stock,
            unit: self
                .unit
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "kg".to_owned()),
            min_stock,
            max_stock,
            cost_per_unit,
            supplier: self.supplier.trim().to_owned(),
            last_updated: today,
        })
    }
}

fn non_negative(value: Option<Decimal>, field: &'static str) -> Result<Decimal, InventoryError> {
    let value = value.unwrap_or(Decimal::ZERO);
    if value < Decimal::ZERO {
        Err(InventoryError::Negative(field))
    } else if value > MAX_STOCK {
        Err(InventoryError::QuantityTooLarge)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn item(current: i64, min: i64, max: i64, cost_centimes: i64) -> InventoryItem {
        InventoryItem {
            id: InventoryItemId::new("1"),
            name: "Mozzarella".to_owned(),
            category: "dairy".to_owned(),
            current_stock: Decimal::from(current),
            unit: "kg".to_owned(),
            min_stock: Decimal::from(min),
            max_stock: Decimal::from(max),
            cost_per_unit: Price::from_centimes(cost_centimes),
            supplier: "Dairy Co.".to_owned(),
            last_updated: date(14),
        }
    }

    #[test]
    fn test_stock_level_thresholds() {
        assert_eq!(item(3, 3, 15, 850).stock_level(), StockLevel::Low);
        assert_eq!(item(5, 3, 15, 850).stock_level(), StockLevel::Normal);
        assert_eq!(item(12, 3, 15, 850).stock_level(), StockLevel::High);
        assert_eq!(item(1, 2, 5, 1200).stock_level(), StockLevel::Low);
    }

    #[test]
    fn test_apply_add_and_saturating_remove() {
        let mut mozzarella = item(5, 3, 15, 850);
        let added = mozzarella
            .apply(
                StockChange {
                    kind: StockChangeKind::Add,
                    quantity: Decimal::from(4),
                },
                date(16),
            )
            .unwrap();
        assert_eq!(added, Decimal::from(9));
        assert_eq!(mozzarella.last_updated, date(16));

        let removed = mozzarella
            .apply(
                StockChange {
                    kind: StockChangeKind::Remove,
                    quantity: Decimal::from(50),
                },
                date(17),
            )
            .unwrap();
        assert_eq!(removed, Decimal::ZERO);
    }

    #[test]
    fn test_apply_rejects_non_positive_quantity() {
        let mut mozzarella = item(5, 3, 15, 850);
        let result = mozzarella.apply(
            StockChange {
                kind: StockChangeKind::Add,
                quantity: Decimal::ZERO,
            },
            date(16),
        );
        assert_eq!(result, Err(InventoryError::NonPositiveQuantity));
        assert_eq!(mozzarella.last_updated, date(14));
    }

    #[test]
    fn test_apply_rejects_oversized_stock() {
        let mut mozzarella = item(5, 3, 15, 850);
        let huge = Decimal::from_str("70000000000000000000000000000").unwrap();
        let add = |quantity| StockChange {
            kind: StockChangeKind::Add,
            quantity,
        };

        assert_eq!(
            mozzarella.apply(add(huge), date(16)),
            Err(InventoryError::QuantityTooLarge)
        );
        assert_eq!(
            mozzarella.apply(add(MAX_STOCK), date(16)),
            Err(InventoryError::QuantityTooLarge)
        );
        assert_eq!(mozzarella.current_stock, Decimal::from(5));
        assert_eq!(mozzarella.last_updated, date(14));

        let removed = mozzarella
            .apply(
                StockChange {
                    kind: StockChangeKind::Remove,
                    quantity: MAX_STOCK,
                },
                date(16),
            )
            .unwrap();
        assert_eq!(removed, Decimal::ZERO);
    }

    #[test]
    fn test_total_value_and_low_count() {
        let items = [item(50, 20, 100, 50), item(5, 3, 15, 850), item(1, 2, 5, 1200)];
        // 25.00 + 42.50 + 12.00
        assert_eq!(total_value(&items), Price::from_centimes(7950));
        assert_eq!(low_stock_count(&items), 1);
    }

    #[test]
    fn test_fill_percent() {
        assert_eq!(item(5, 3, 15, 850).fill_percent(), 33);
        assert_eq!(item(20, 3, 15, 850).fill_percent(), 100);
        assert_eq!(item(5, 3, 0, 850).fill_percent(), 0);
    }

    #[test]
    fn test_filter() {
        let filter = InventoryFilter {
            q: Some("mozz".to_owned()),
            category: Some("dairy".to_owned()),
        };
        assert!(filter.matches(&item(5, 3, 15, 850)));

        let other = InventoryFilter {
            q: None,
            category: Some("herbs".to_owned()),
        };
        assert!(!other.matches(&item(5, 3, 15, 850)));
    }

    #[test]
    fn test_draft_defaults() {
        let draft = InventoryDraft {
            name: "Semolina".to_owned(),
            category: "bakery".to_owned(),
            ..InventoryDraft::default()
        };
        let created = draft.into_item(InventoryItemId::new("6"), date(20)).unwrap();
        assert_eq!(created.unit, "kg");
        assert_eq!(created.current_stock, Decimal::ZERO);
        assert_eq!(created.stock_level(), StockLevel::Low);

        let nameless = InventoryDraft::default();
        assert_eq!(
            nameless.into_item(InventoryItemId::new("7"), date(20)),
            Err(InventoryError::MissingField("name"))
        );
    }
}
