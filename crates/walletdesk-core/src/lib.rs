//! `walletdesk` Core Library
//!
//! Shared functionality for the walletdesk admin console:
//! - Typed client for the custodial wallet admin API
//! - Cookie-backed admin session store and route guard
//! - Settings resolution and hierarchy
//! - Common error types

pub mod api;
pub mod config;
pub mod cookies;
pub mod error;
pub mod models;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod tracing_init;

pub use api::{ApiClient, ClientConfig, SessionObserver};
pub use config::Settings;
pub use error::{ApiError, Error, Result};
pub use session::{GuardDecision, RouteGuard, SessionStore};
