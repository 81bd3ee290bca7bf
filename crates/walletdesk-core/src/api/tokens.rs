//! Token list endpoints.

use super::client::ApiClient;
use crate::error::Result;

/// Supported token list.
#[derive(Debug, Clone, Copy)]
pub struct TokensApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub const fn tokens(&self) -> TokensApi<'_> {
        TokensApi { client: self }
    }
}

impl TokensApi<'_> {
    /// `GET /tokens`
    pub async fn get_tokens(&self) -> Result<serde_json::Value> {
        self.client.get("/tokens").await
    }

    /// `POST /tokens/refresh`
    pub async fn refresh_tokens(&self) -> Result<serde_json::Value> {
        self.client.post::<(), _>("/tokens/refresh", None).await
    }
}
