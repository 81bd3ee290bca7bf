//! Login payloads and the cached admin identity.

use serde::{Deserialize, Serialize};

/// Authenticated staff member, as returned by `/admin/login` and cached in
/// the `admin_user` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
}

/// Body of `POST /admin/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub admin: AdminUser,
}
