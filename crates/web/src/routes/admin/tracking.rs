//! Tracking tab: drivers and deliveries in progress.

use askama::Template;
use askama_web::WebTemplate;
use wakalni_core::DriverStatus;
use wakalni_core::accounts::{Delivery, Driver, search_drivers};

use super::AdminFrame;
use crate::filters;
use crate::middleware::PageContext;
use crate::routes::ListQuery;
use crate::state::AppState;

/// Drivers per status, for the summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverCounts {
    pub available: usize,
    pub on_route: usize,
    pub offline: usize,
}

impl DriverCounts {
    #[must_use]
    pub fn of(drivers: &[Driver]) -> Self {
        let mut counts = Self::default();
        for driver in drivers {
            match driver.status {
                DriverStatus::Available => counts.available += 1,
                DriverStatus::OnRoute => counts.on_route += 1,
                DriverStatus::Offline => counts.offline += 1,
            }
        }
        counts
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/tracking.html")]
pub struct TrackingTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub drivers: Vec<Driver>,
    pub counts: DriverCounts,
    pub deliveries: Vec<Delivery>,
    pub query: ListQuery,
}

pub(super) fn page(
    state: &AppState,
    ctx: PageContext,
    frame: AdminFrame,
    query: ListQuery,
) -> TrackingTemplate {
    let store = state.store();
    TrackingTemplate {
        drivers: search_drivers(store.drivers(), query.q_text())
            .into_iter()
            .cloned()
            .collect(),
        counts: DriverCounts::of(store.drivers()),
        deliveries: store.deliveries().to_vec(),
        ctx,
        frame,
        query,
    }
}
