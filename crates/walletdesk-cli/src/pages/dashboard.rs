//! Dashboard: order counters and the most recent orders.

use tracing::error;
use walletdesk_core::Result;
use walletdesk_core::models::{DashboardStats, Order, OrderPage};

use super::Request;

#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub stats: DashboardStats,
    pub recent: Vec<Order>,
    pub loading: bool,
    /// Rows fetched from page 1.
    pub limit: u32,
}

impl DashboardPage {
    pub fn new(limit: u32) -> Self {
        Self {
            stats: DashboardStats::default(),
            recent: Vec::new(),
            loading: true,
            limit: limit.max(1),
        }
    }

    /// Request page 1.
    pub const fn start_load(&mut self) -> Request {
        self.loading = true;
        Request::LoadDashboard { limit: self.limit }
    }

    /// Recompute the counters. A failure is logged and leaves the previous
    /// figures.
    pub fn finish_load(&mut self, result: Result<OrderPage>) {
        match result {
            Ok(page) => {
                self.stats = DashboardStats::from_page(&page);
                self.recent = page.orders;
            }
            Err(e) => error!(error = %e, "Failed to load dashboard"),
        }
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walletdesk_core::Error;
    use walletdesk_core::models::OrderStatus;
    use walletdesk_core::testing::sample_order;

    #[test]
    fn failed_load_keeps_previous_figures() {
        let mut page = DashboardPage::new(10);
        assert_eq!(page.start_load(), Request::LoadDashboard { limit: 10 });
        page.finish_load(Ok(OrderPage {
            orders: vec![sample_order("a", OrderStatus::Pending)],
            pagination: None,
        }));
        assert_eq!(page.stats.pending, 1);

        page.start_load();
        assert!(page.loading);
        page.finish_load(Err(Error::SessionExpired));
        assert!(!page.loading);
        assert_eq!(page.stats.total, 1);
        assert_eq!(page.recent.len(), 1);
    }
}
