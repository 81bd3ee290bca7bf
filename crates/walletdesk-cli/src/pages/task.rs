//! Backend work requested by the pages.
//!
//! Pages never await the network themselves. A state change that needs the
//! backend returns a [`Request`]; whoever drives the pages runs it (the TUI
//! on a spawned task, tests inline) and hands the [`Outcome`] back to
//! [`crate::app::App::apply`].

use walletdesk_core::models::{AdminUser, OrderPage, SystemConfig};
use walletdesk_core::{ApiClient, Result};

/// Row actions on the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Confirm,
    Cancel,
}

impl RowAction {
    pub const fn failure_prefix(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm failed",
            Self::Cancel => "Cancel failed",
        }
    }

    pub const fn success_text(self) -> &'static str {
        match self {
            Self::Confirm => "Order confirmed",
            Self::Cancel => "Order cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Login {
        username: String,
        password: String,
    },
    LoadDashboard {
        limit: u32,
    },
    LoadOrders {
        page: u32,
        limit: u32,
    },
    Order {
        order_id: String,
        action: RowAction,
        tx_hash: Option<String>,
    },
    LoadSettings,
    SaveSettings(Box<SystemConfig>),
    ProbeQr(String),
}

/// Result of a [`Request`], tagged with what the page needs to apply it.
#[derive(Debug)]
pub enum Outcome {
    Login(Result<AdminUser>),
    Dashboard(Result<OrderPage>),
    Orders {
        page: u32,
        result: Result<OrderPage>,
    },
    Order {
        order_id: String,
        action: RowAction,
        result: Result<serde_json::Value>,
    },
    Settings(Result<SystemConfig>),
    Saved(Result<SystemConfig>),
    Qr {
        url: String,
        available: bool,
    },
}

impl Request {
    /// Issue the backend call.
    pub async fn execute(self, api: &ApiClient) -> Outcome {
        match self {
            Self::Login { username, password } => {
                Outcome::Login(api.session().login(api, &username, &password).await)
            }
            Self::LoadDashboard { limit } => {
                Outcome::Dashboard(api.p2p().get_orders(1, limit).await)
            }
            Self::LoadOrders { page, limit } => Outcome::Orders {
                page,
                result: api.p2p().get_orders(page, limit).await,
            },
            Self::Order {
                order_id,
                action,
                tx_hash,
            } => {
                let result = match action {
                    RowAction::Confirm => {
                        api.p2p().confirm_order(&order_id, tx_hash.as_deref()).await
                    }
                    RowAction::Cancel => api.p2p().cancel_order(&order_id).await,
                };
                Outcome::Order {
                    order_id,
                    action,
                    result,
                }
            }
            Self::LoadSettings => Outcome::Settings(api.system_config().get_config().await),
            Self::SaveSettings(config) => {
                Outcome::Saved(api.system_config().update_config(&config).await)
            }
            Self::ProbeQr(url) => {
                let available = api.image_available(&url).await;
                Outcome::Qr { url, available }
            }
        }
    }
}
