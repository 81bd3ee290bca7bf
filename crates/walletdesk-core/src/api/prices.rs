//! Price feed endpoint.

use super::client::{ApiClient, encode_segment};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct PricesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub const fn prices(&self) -> PricesApi<'_> {
        PricesApi { client: self }
    }
}

impl PricesApi<'_> {
    /// `GET /prices?symbols=A,B`
    pub async fn get_prices(&self, symbols: &[&str]) -> Result<serde_json::Value> {
        if symbols.is_empty() {
            return Err(Error::Validation("at least one symbol is required".into()));
        }
        let joined = symbols
            .iter()
            .map(|s| encode_segment(s))
            .collect::<Vec<_>>()
            .join(",");
        self.client.get(&format!("/prices?symbols={joined}")).await
    }
}
