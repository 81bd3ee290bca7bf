//! `POST /admin/login`.

use reqwest::Method;

use super::client::{ApiClient, OnUnauthorized};
use crate::error::Result;
use crate::models::{LoginRequest, LoginResponse};

/// Authentication endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Exchange credentials for a bearer token.
    ///
    /// A 401 here means bad credentials and is returned as an API error; it
    /// does not expire the current session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest { username, password };
        self.client
            .send(Method::POST, "/admin/login", Some(&body), OnUnauthorized::Report)
            .await
    }
}
