//! Admin API client and per-resource modules.
//!
//! Each resource module exposes a borrowing handle off [`ApiClient`]
//! (`client.p2p()`, `client.system_config()`, ...) whose methods issue exactly
//! one HTTP call and return the parsed body. Nothing is retried.

pub mod auth;
pub mod client;
pub mod p2p;
pub mod prices;
pub mod system_config;
pub mod tokens;


pub use auth::AuthApi;
pub use client::{ApiClient, ClientConfig, SessionObserver};
pub use p2p::P2pApi;
pub use prices::PricesApi;
pub use system_config::SystemConfigApi;
pub use tokens::TokensApi;
