//! System configuration endpoints.

use super::client::ApiClient;
use crate::error::Result;
use crate::models::SystemConfig;

/// Singleton configuration record endpoints.
#[derive(Debug, Clone, Copy)]
pub struct SystemConfigApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub const fn system_config(&self) -> SystemConfigApi<'_> {
        SystemConfigApi { client: self }
    }
}

impl SystemConfigApi<'_> {
    /// `GET /config`
    pub async fn get_config(&self) -> Result<SystemConfig> {
        self.client.get("/config").await
    }

    /// `PUT /admin/config`. The whole record is overwritten; it is validated
    /// before anything is sent.
    pub async fn update_config(&self, config: &SystemConfig) -> Result<SystemConfig> {
        config.validate()?;
        self.client.put("/admin/config", config).await
    }
}
