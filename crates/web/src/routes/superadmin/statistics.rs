//! Statistics tab: platform revenue, commission and growth by month.

use askama::Template;
use askama_web::WebTemplate;
use wakalni_core::Price;
use wakalni_core::stats::{MonthlyPoint, monthly_series};

use super::SuperFrame;
use crate::filters;
use crate::middleware::PageContext;
use crate::routes::admin::statistics::{Bar, revenue_bars};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "superadmin/statistics.html")]
pub struct StatisticsTemplate {
    pub ctx: PageContext,
    pub frame: SuperFrame,
    pub months: Vec<MonthlyPoint>,
    pub bars: Vec<Bar>,
    pub total_revenue: Price,
    pub total_commission: Price,
    pub total_orders: u32,
}

pub(super) fn page(state: &AppState, ctx: PageContext, frame: SuperFrame) -> StatisticsTemplate {
    let series = &state.store().charts().platform_monthly;
    let months = monthly_series(series);

    StatisticsTemplate {
        bars: revenue_bars(series),
        total_revenue: months.iter().map(|m| m.revenue).sum(),
        total_commission: months.iter().map(|m| m.commission).sum(),
        total_orders: months.iter().map(|m| m.orders).sum(),
        months,
        ctx,
        frame,
    }
}
