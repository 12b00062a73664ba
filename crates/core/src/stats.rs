//! Dashboard aggregates.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::catalog::Restaurant;
use crate::orders::{Order, StatusCounts};
use crate::types::{OrderStatus, Price, RestaurantStatus};

/// Share of restaurant revenue the platform keeps, in percent.
pub const COMMISSION_PERCENT: u32 = 10;

/// Platform commission on `revenue`.
#[must_use]
pub fn commission(revenue: Price) -> Price {
    revenue.percent(Decimal::from(COMMISSION_PERCENT))
}

/// Percentage change from `previous` to `current`, one decimal.
///
/// `None` when there is nothing to compare against or the ratio is out of
/// range.
#[must_use]
pub fn growth_percent(previous: Price, current: Price) -> Option<Decimal> {
    if previous.amount().is_zero() {
        return None;
    }
    let change = current
        .amount()
        .saturating_sub(previous.amount())
        .saturating_mul(Decimal::ONE_HUNDRED)
        .checked_div(previous.amount())?;
    Some(change.round_dp(1))
}

/// One point of a revenue chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Axis label ("Mon", "Jul", "7 PM").
    pub label: String,
    #[serde(default)]
    pub amount: Price,
    #[serde(default)]
    pub orders: u32,
}

/// A monthly platform point with derived commission and growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub label: String,
    pub revenue: Price,
    pub orders: u32,
    pub commission: Price,
    /// Commission growth against the previous month.
    pub growth: Option<Decimal>,
}

/// Derive commission and month-over-month growth for a revenue series.
#[must_use]
pub fn monthly_series(points: &[SeriesPoint]) -> Vec<MonthlyPoint> {
    let mut previous: Option<Price> = None;
    points
        .iter()
        .map(|point| {
            let commission = commission(point.amount);
            let growth = previous.and_then(|prev| growth_percent(prev, commission));
            previous = Some(commission);
            MonthlyPoint {
                label: point.label.clone(),
                revenue: point.amount,
                orders: point.orders,
                commission,
                growth,
            }
        })
        .collect()
}

/// Bar length for a CSS chart, as a percentage of the series maximum.
#[must_use]
pub fn bar_percent(value: Price, max: Price) -> u32 {
    if !max.is_positive() {
        return 0;
    }
    value
        .amount()
        .saturating_mul(Decimal::ONE_HUNDRED)
        .checked_div(max.amount())
        .unwrap_or(Decimal::ONE_HUNDRED)
        .round()
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0)
}

/// Best-selling dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub name: String,
    pub quantity: u32,
    pub revenue: Price,
}

/// Headline numbers of the restaurant dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantOverview {
    pub total_orders: usize,
    /// Revenue from completed orders.
    pub revenue: Price,
    pub average_order: Price,
    pub counts: StatusCounts,
    pub top_items: Vec<TopItem>,
}

impl RestaurantOverview {
    /// Aggregate `orders`; cancelled orders are excluded from best sellers.
    #[must_use]
    pub fn compute(orders: &[Order], top: usize) -> Self {
        let counts = StatusCounts::of(orders);
        let revenue: Price = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .map(|o| o.total)
            .sum();
        let average_order = if counts.completed == 0 {
            Price::ZERO
        } else {
            Price::new(revenue.amount() / Decimal::from(counts.completed)).round()
        };

        let mut by_name: HashMap<&str, TopItem> = HashMap::new();
        for line in orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .flat_map(|o| &o.items)
        {
            let entry = by_name.entry(line.name.as_str()).or_insert_with(|| TopItem {
                name: line.name.clone(),
                quantity: 0,
                revenue: Price::ZERO,
            });
            entry.quantity += line.quantity;
            entry.revenue += line.total();
        }
        let mut top_items: Vec<TopItem> = by_name.into_values().collect();
        top_items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
        top_items.truncate(top);

        Self {
            total_orders: orders.len(),
            revenue,
            average_order,
            counts,
            top_items,
        }
    }
}

/// Headline numbers of the superadmin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformOverview {
    pub total_revenue: Price,
    pub total_commission: Price,
    pub total_orders: u32,
    pub restaurants: usize,
    pub active_restaurants: usize,
    pub pending_approvals: usize,
    /// Mean rating of active restaurants, one decimal.
    pub average_rating: f32,
    pub top_restaurants: Vec<(String, Price)>,
}

impl PlatformOverview {
    #[must_use]
    pub fn compute(restaurants: &[Restaurant], top: usize) -> Self {
        let total_revenue: Price = restaurants.iter().map(|r| r.revenue).sum();
        let active: Vec<&Restaurant> = restaurants
            .iter()
            .filter(|r| r.status == RestaurantStatus::Active)
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let average_rating = if active.is_empty() {
            0.0
        } else {
            let sum: f32 = active.iter().map(|r| r.rating).sum();
            (sum / active.len() as f32 * 10.0).round() / 10.0
        };

        let mut ranked: Vec<(String, Price)> = restaurants
            .iter()
            .map(|r| (r.name.clone(), r.revenue))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top);

        Self {
            total_revenue,
            total_commission: commission(total_revenue),
            total_orders: restaurants.iter().map(|r| r.orders).sum(),
            restaurants: restaurants.len(),
            active_restaurants: active.len(),
            pending_approvals: restaurants
                .iter()
                .filter(|r| r.status == RestaurantStatus::Pending)
                .count(),
            average_rating,
            top_restaurants: ranked,
        }
    }
}
