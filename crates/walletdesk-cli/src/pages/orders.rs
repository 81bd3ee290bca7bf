//! Order list: paginated table with confirm/cancel actions.

use std::collections::HashSet;

use tracing::{error, info};
use walletdesk_core::Result;
use walletdesk_core::models::{Order, OrderPage};

use super::{Notice, Request, RowAction};

/// Prompt for the on-chain hash before confirming an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxHashModal {
    pub order_id: String,
    pub input: String,
}

#[derive(Debug, Clone)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub loading: bool,
    /// 1-based.
    pub current_page: u32,
    /// Never below one.
    pub total_pages: u32,
    pub limit: u32,
    /// Orders with a request in flight; their actions are disabled.
    pub in_progress: HashSet<String>,
    pub tx_modal: Option<TxHashModal>,
    pub selected: usize,
    pub notice: Option<Notice>,
}

impl OrdersPage {
    pub fn new(limit: u32) -> Self {
        Self {
            orders: Vec::new(),
            loading: true,
            current_page: 1,
            total_pages: 1,
            limit: limit.max(1),
            in_progress: HashSet::new(),
            tx_modal: None,
            selected: 0,
            notice: None,
        }
    }

    /// Request the current page.
    pub const fn start_load(&mut self) -> Request {
        self.loading = true;
        Request::LoadOrders {
            page: self.current_page,
            limit: self.limit,
        }
    }

    /// Apply a fetched page. Answers for a page the operator has already
    /// left are dropped; on failure the previous rows stay.
    pub fn finish_load(&mut self, page: u32, result: Result<OrderPage>) {
        if page != self.current_page {
            return;
        }
        match result {
            Ok(fetched) => {
                self.total_pages = fetched.total_pages();
                self.orders = fetched.orders;
                self.selected = self.selected.min(self.orders.len().saturating_sub(1));
            }
            Err(e) => error!(error = %e, page, "Failed to load orders"),
        }
        self.loading = false;
    }

    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Advance one page. `None` when already on the last page.
    pub fn next_page(&mut self) -> Option<Request> {
        let next = (self.current_page + 1).min(self.total_pages);
        self.go_to(next)
    }

    pub fn prev_page(&mut self) -> Option<Request> {
        let prev = self.current_page.saturating_sub(1).max(1);
        self.go_to(prev)
    }

    fn go_to(&mut self, page: u32) -> Option<Request> {
        if page == self.current_page {
            return None;
        }
        self.current_page = page;
        self.selected = 0;
        Some(self.start_load())
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.orders.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.orders.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn is_busy(&self, order_id: &str) -> bool {
        self.in_progress.contains(order_id)
    }

    fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Whether `action` is offered for the row right now.
    fn allowed(&self, order_id: &str, action: RowAction) -> bool {
        if self.is_busy(order_id) {
            return false;
        }
        self.find(order_id).is_some_and(|o| match action {
            RowAction::Confirm => o.status.can_confirm(),
            RowAction::Cancel => o.status.can_cancel(),
        })
    }

    /// Confirm without a transaction hash.
    pub fn confirm(&mut self, order_id: &str) -> Option<Request> {
        self.start_action(order_id, RowAction::Confirm, None)
    }

    /// Open the hash prompt for a confirmable order.
    pub fn open_tx_modal(&mut self, order_id: &str) -> bool {
        if !self.allowed(order_id, RowAction::Confirm) {
            return false;
        }
        self.tx_modal = Some(TxHashModal {
            order_id: order_id.to_string(),
            input: String::new(),
        });
        true
    }

    pub fn close_tx_modal(&mut self) {
        self.tx_modal = None;
    }

    /// Confirm with the entered hash. A blank hash sends nothing and keeps
    /// the prompt open. The prompt closes once the confirmation succeeds.
    pub fn submit_tx_modal(&mut self) -> Option<Request> {
        let modal = self.tx_modal.as_ref()?;
        let hash = modal.input.trim().to_string();
        if hash.is_empty() {
            return None;
        }
        let order_id = modal.order_id.clone();
        self.start_action(&order_id, RowAction::Confirm, Some(hash))
    }

    /// Cancel an order. Callers ask the operator first.
    pub fn cancel(&mut self, order_id: &str) -> Option<Request> {
        self.start_action(order_id, RowAction::Cancel, None)
    }

    /// Mark the row busy and request the action. Other rows stay usable.
    fn start_action(
        &mut self,
        order_id: &str,
        action: RowAction,
        tx_hash: Option<String>,
    ) -> Option<Request> {
        if !self.allowed(order_id, action) {
            return None;
        }
        self.in_progress.insert(order_id.to_string());
        Some(Request::Order {
            order_id: order_id.to_string(),
            action,
            tx_hash,
        })
    }

    /// Release the row and report. A success reloads the current page.
    pub fn finish_action(
        &mut self,
        order_id: &str,
        action: RowAction,
        result: Result<serde_json::Value>,
    ) -> Option<Request> {
        self.in_progress.remove(order_id);
        match result {
            Ok(_) => {
                info!(order_id, ?action, "Order updated");
                if self
                    .tx_modal
                    .as_ref()
                    .is_some_and(|m| m.order_id == order_id)
                {
                    self.tx_modal = None;
                }
                self.notice = Some(Notice::Success(action.success_text().into()));
                Some(self.start_load())
            }
            Err(e) => {
                error!(order_id, ?action, error = %e, "Order action failed");
                self.notice = Some(Notice::Error(format!(
                    "{}: {}",
                    action.failure_prefix(),
                    e.user_message()
                )));
                None
            }
        }
    }
}
