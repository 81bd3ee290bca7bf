//! walletdesk CLI Library
//!
//! Terminal admin console for the custodial USDT wallet backend.
//! Provides one-shot subcommands and an interactive TUI (ratatui).

pub mod app;
pub mod auth_cmd;
pub mod context;
pub mod dashboard_cmd;
pub mod fmt;
pub mod market_cmd;
pub mod order_cmd;
pub mod pages;
pub mod settings_cmd;
pub mod tui;
pub mod ui;
