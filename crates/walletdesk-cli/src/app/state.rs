//! Application state and route transitions.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;
use walletdesk_core::config::UiSettings;
use walletdesk_core::models::AdminUser;
use walletdesk_core::{ApiClient, GuardDecision, RouteGuard, SessionObserver};

use crate::pages::{
    DashboardPage, LoginPage, Notice, OrdersPage, Outcome, Request, Route, SettingsPage,
};

pub const SESSION_EXPIRED: &str = "Session expired, please log in again";

/// Set by the API client when the server rejects the session.
#[derive(Debug, Default)]
pub struct SessionFlag(AtomicBool);

impl SessionFlag {
    /// Read and clear the flag.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

impl SessionObserver for SessionFlag {
    fn session_expired(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// TUI application state.
#[derive(Debug)]
pub struct App {
    pub route: Route,
    pub user: Option<AdminUser>,
    pub login: LoginPage,
    pub dashboard: DashboardPage,
    pub orders: OrdersPage,
    pub settings: SettingsPage,
    /// Order awaiting the operator's yes/no before cancelling.
    pub cancel_prompt: Option<String>,
    pub should_quit: bool,
    expired: Arc<SessionFlag>,
}

impl App {
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            route: Route::Login,
            user: None,
            login: LoginPage::new(),
            dashboard: DashboardPage::new(ui.dashboard_page_size),
            orders: OrdersPage::new(ui.orders_page_size),
            settings: SettingsPage::new(),
            cancel_prompt: None,
            should_quit: false,
            expired: Arc::new(SessionFlag::default()),
        }
    }

    /// Observer to attach to the API client.
    pub fn observer(&self) -> Arc<dyn SessionObserver> {
        Arc::clone(&self.expired) as Arc<dyn SessionObserver>
    }

    /// Go to `route`, passing protected screens through the guard, and
    /// request the page's data. Open prompts are dropped.
    pub fn navigate(&mut self, api: &ApiClient, route: Route) -> Vec<Request> {
        self.cancel_prompt = None;
        self.orders.tx_modal = None;
        if !route.is_protected() {
            self.route = Route::Login;
            return Vec::new();
        }
        match RouteGuard::check(api.session()) {
            GuardDecision::Allow(user) => {
                self.user = Some(user);
                self.route = route;
                self.refresh()
            }
            GuardDecision::Pending | GuardDecision::RedirectToLogin => {
                self.user = None;
                self.route = Route::Login;
                Vec::new()
            }
        }
    }

    /// Request the current page again.
    pub fn refresh(&mut self) -> Vec<Request> {
        match self.route {
            Route::Login => Vec::new(),
            Route::Dashboard => vec![self.dashboard.start_load()],
            Route::Orders => vec![self.orders.start_load()],
            Route::Settings => vec![self.settings.start_load()],
        }
    }

    /// Hand a finished request to its page. Returns follow-up requests.
    pub fn apply(&mut self, api: &ApiClient, outcome: Outcome) -> Vec<Request> {
        let follow_up = match outcome {
            Outcome::Login(result) => {
                if self.login.finish_submit(&result) {
                    self.navigate(api, Route::Dashboard)
                } else {
                    Vec::new()
                }
            }
            Outcome::Dashboard(result) => {
                self.dashboard.finish_load(result);
                Vec::new()
            }
            Outcome::Orders { page, result } => {
                self.orders.finish_load(page, result);
                Vec::new()
            }
            Outcome::Order {
                order_id,
                action,
                result,
            } => self
                .orders
                .finish_action(&order_id, action, result)
                .into_iter()
                .collect(),
            Outcome::Settings(result) => self.settings.finish_load(result).into_iter().collect(),
            Outcome::Saved(result) => self.settings.finish_save(result).into_iter().collect(),
            Outcome::Qr { url, available } => {
                self.settings.finish_probe(url, available);
                Vec::new()
            }
        };
        if self.check_session() {
            return Vec::new();
        }
        follow_up
    }

    /// Run `requests` and their follow-ups to completion, one at a time.
    pub async fn drive(&mut self, api: &ApiClient, requests: impl IntoIterator<Item = Request>) {
        let mut queue: VecDeque<Request> = requests.into_iter().collect();
        while let Some(request) = queue.pop_front() {
            let outcome = request.execute(api).await;
            queue.extend(self.apply(api, outcome));
        }
    }

    /// Route to login if the server rejected the session since the last
    /// check. Returns whether that happened.
    pub fn check_session(&mut self) -> bool {
        if !self.expired.take() {
            return false;
        }
        info!("Session expired; returning to login");
        self.route = Route::Login;
        self.user = None;
        self.cancel_prompt = None;
        self.orders.tx_modal = None;
        self.orders.notice = None;
        self.settings.notice = None;
        self.login.error = Some(SESSION_EXPIRED.into());
        true
    }

    pub fn submit_login(&mut self) -> Vec<Request> {
        self.login.start_submit().into_iter().collect()
    }

    pub fn logout(&mut self, api: &ApiClient) {
        api.session().logout();
        self.user = None;
        self.route = Route::Login;
        self.cancel_prompt = None;
        self.orders.tx_modal = None;
    }

    /// Ask before cancelling the selected order.
    pub fn request_cancel(&mut self) {
        let Some(order) = self.orders.selected_order() else {
            return;
        };
        if order.status.can_cancel() && !self.orders.is_busy(&order.id) {
            self.cancel_prompt = Some(order.id.clone());
        }
    }

    pub fn answer_cancel(&mut self, yes: bool) -> Vec<Request> {
        match self.cancel_prompt.take() {
            Some(order_id) if yes => self.orders.cancel(&order_id).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn confirm_selected(&mut self) -> Vec<Request> {
        let Some(id) = self.orders.selected_order().map(|o| o.id.clone()) else {
            return Vec::new();
        };
        self.orders.confirm(&id).into_iter().collect()
    }

    pub fn open_tx_modal_for_selected(&mut self) {
        if let Some(id) = self.orders.selected_order().map(|o| o.id.clone()) {
            self.orders.open_tx_modal(&id);
        }
    }

    /// Notice of the current page, if any.
    pub fn notice(&self) -> Option<&Notice> {
        match self.route {
            Route::Orders => self.orders.notice.as_ref(),
            Route::Settings => self.settings.notice.as_ref(),
            Route::Login | Route::Dashboard => None,
        }
    }

    pub fn dismiss_notice(&mut self) {
        match self.route {
            Route::Orders => self.orders.notice = None,
            Route::Settings => self.settings.notice = None,
            Route::Login | Route::Dashboard => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_cleared_on_take() {
        let flag = SessionFlag::default();
        assert!(!flag.take());
        flag.session_expired();
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn expiry_routes_to_login_with_message() {
        let mut app = App::new(&UiSettings::default());
        app.route = Route::Orders;
        app.observer().session_expired();
        assert!(app.check_session());
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login.error.as_deref(), Some(SESSION_EXPIRED));
        assert!(!app.check_session());
    }

    #[test]
    fn expiry_drops_follow_up_requests() {
        let mut app = App::new(&UiSettings::default());
        app.route = Route::Orders;
        app.orders.orders = vec![walletdesk_core::testing::sample_order(
            "paid-1",
            walletdesk_core::models::OrderStatus::Paid,
        )];
        assert_eq!(app.confirm_selected().len(), 1);
        app.observer().session_expired();
        let api = ApiClient::new(
            &walletdesk_core::ClientConfig::default(),
            Arc::new(walletdesk_core::SessionStore::in_memory()),
        )
        .unwrap();
        let follow_up = app.apply(
            &api,
            Outcome::Order {
                order_id: "paid-1".into(),
                action: crate::pages::RowAction::Confirm,
                result: Err(walletdesk_core::Error::SessionExpired),
            },
        );
        assert!(follow_up.is_empty());
        assert_eq!(app.route, Route::Login);
        assert!(!app.orders.is_busy("paid-1"));
    }

    #[test]
    fn notice_follows_route() {
        let mut app = App::new(&UiSettings::default());
        app.orders.notice = Some(Notice::Success("Order confirmed".into()));
        assert!(app.notice().is_none());
        app.route = Route::Orders;
        assert_eq!(app.notice().map(Notice::text), Some("Order confirmed"));
        app.dismiss_notice();
        assert!(app.notice().is_none());
    }
}
