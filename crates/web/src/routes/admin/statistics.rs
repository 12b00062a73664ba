//! Statistics tab: revenue charts and best sellers.

use askama::Template;
use askama_web::WebTemplate;
use wakalni_core::Price;
use wakalni_core::stats::{RestaurantOverview, SeriesPoint, bar_percent};

use super::AdminFrame;
use crate::db::OrderRepository;
use crate::filters;
use crate::middleware::PageContext;
use crate::routes::ListQuery;
use crate::state::AppState;

/// Best sellers listed on the statistics tab.
const TOP_ITEMS: usize = 5;

/// Revenue chart granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Parse the `period` query value; anything unknown shows the daily chart.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("weekly") => Self::Weekly,
            Some("monthly") => Self::Monthly,
            _ => Self::Daily,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

/// One bar of a CSS chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub amount: Price,
    pub orders: u32,
    /// Length relative to the tallest bar, 0 to 100.
    pub percent: u32,
}

/// Bars sized by amount.
#[must_use]
pub fn revenue_bars(points: &[SeriesPoint]) -> Vec<Bar> {
    let max = points.iter().map(|p| p.amount).max().unwrap_or(Price::ZERO);
    points
        .iter()
        .map(|p| Bar {
            label: p.label.clone(),
            amount: p.amount,
            orders: p.orders,
            percent: bar_percent(p.amount, max),
        })
        .collect()
}

/// Bars sized by order count.
#[must_use]
pub fn order_bars(points: &[SeriesPoint]) -> Vec<Bar> {
    let max = points.iter().map(|p| p.orders).max().unwrap_or(0);
    points
        .iter()
        .map(|p| Bar {
            label: p.label.clone(),
            amount: p.amount,
            orders: p.orders,
            percent: if max == 0 { 0 } else { p.orders * 100 / max },
        })
        .collect()
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/statistics.html")]
pub struct StatisticsTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub period: Period,
    pub periods: &'static [Period],
    pub revenue: Vec<Bar>,
    pub period_total: Price,
    pub period_orders: u32,
    pub peak_hours: Vec<Bar>,
    pub overview: RestaurantOverview,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: AdminFrame,
    query: &ListQuery,
) -> StatisticsTemplate {
    let charts = state.store().charts();
    let period = Period::from_query(query.period.as_deref());
    let series = match period {
        Period::Daily => &charts.daily,
        Period::Weekly => &charts.weekly,
        Period::Monthly => &charts.monthly,
    };
    let orders = OrderRepository::new(state.store()).all().await;

    StatisticsTemplate {
        ctx,
        frame,
        period,
        periods: &Period::ALL,
        revenue: revenue_bars(series),
        period_total: series.iter().map(|p| p.amount).sum(),
        period_orders: series.iter().map(|p| p.orders).sum(),
        peak_hours: order_bars(&charts.peak_hours),
        overview: RestaurantOverview::compute(&orders, TOP_ITEMS),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn point(label: &str, amount: i64, orders: u32) -> SeriesPoint {
        SeriesPoint {
            label: label.to_owned(),
            amount: Price::from_dinars(amount),
            orders,
        }
    }

    #[test]
    fn test_period_from_query() {
        assert_eq!(Period::from_query(Some("weekly")), Period::Weekly);
        assert_eq!(Period::from_query(Some("yearly")), Period::Daily);
        assert_eq!(Period::from_query(None), Period::Daily);
    }

    #[test]
    fn test_bars_scale_to_the_tallest() {
        let points = [point("Mon", 2000, 10), point("Tue", 4000, 40)];
        let revenue = revenue_bars(&points);
        assert_eq!(revenue[0].percent, 50);
        assert_eq!(revenue[1].percent, 100);

        let orders = order_bars(&points);
        assert_eq!(orders[0].percent, 25);
        assert!(order_bars(&[point("Mon", 0, 0)]).iter().all(|b| b.percent == 0));
    }
}
