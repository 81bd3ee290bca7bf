//! Admin API request and response records.

pub mod auth;
pub mod order;
pub mod system_config;

pub use auth::{AdminUser, LoginRequest, LoginResponse};
pub use order::{ConfirmOrderRequest, DashboardStats, Order, OrderPage, OrderStatus, Pagination};
pub use system_config::SystemConfig;

use serde::{Deserialize, Deserializer};

/// Deserialize a string field that the server may send as `null`.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
