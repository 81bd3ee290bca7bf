//! Page models for the TUI.
//!
//! Each page owns its local state. Backend calls leave a page as a
//! [`Request`] and come back as an [`Outcome`], so nothing here awaits the
//! network or depends on the terminal.

pub mod dashboard;
pub mod login;
pub mod orders;
pub mod settings;
pub mod task;

pub use dashboard::DashboardPage;
pub use login::{LoginField, LoginPage};
pub use orders::{OrdersPage, TxHashModal};
pub use settings::{QrPreview, SettingsField, SettingsPage};
pub use task::{Outcome, Request, RowAction};

/// Protected and public screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Orders,
    Settings,
}

impl Route {
    /// Screens shown in the navigation bar.
    pub const NAV: [Self; 3] = [Self::Dashboard, Self::Orders, Self::Settings];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Orders => "Orders",
            Self::Settings => "Settings",
        }
    }

    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Blocking result message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(t) | Self::Error(t) => t,
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
