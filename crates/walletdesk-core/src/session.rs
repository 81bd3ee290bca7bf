//! Admin session store and route guard.
//!
//! The session is two cookies: `admin_token` (bearer string) and
//! `admin_user` (JSON-encoded [`AdminUser`]), both valid for seven days.
//! A `SessionStore` is shared through `Arc` with the API client and every
//! page that needs it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cookies::{CookieStorage, MemoryCookieJar};
use crate::error::{ApiError, Error, Result};
use crate::models::AdminUser;

pub const TOKEN_COOKIE: &str = "admin_token";
pub const USER_COOKIE: &str = "admin_user";
/// Lifetime of both session cookies.
pub const SESSION_TTL_DAYS: i64 = 7;

const LOGIN_FALLBACK: &str = "Login failed";

#[derive(Debug)]
struct SessionState {
    user: Option<AdminUser>,
    loading: bool,
}

/// Current admin user plus the cookies backing it.
pub struct SessionStore {
    storage: Box<dyn CookieStorage>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store over `storage`. The store starts in the loading state
    /// until [`SessionStore::load`] runs.
    pub fn new(storage: impl CookieStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            state: Mutex::new(SessionState {
                user: None,
                loading: true,
            }),
        }
    }

    /// Store backed by an in-process jar.
    pub fn in_memory() -> Self {
        Self::new(MemoryCookieJar::new())
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rehydrate the user from the cookies.
    ///
    /// Both cookies must be present. A user cookie that does not parse wipes
    /// the session instead of surfacing an error.
    pub fn load(&self) {
        let token = self.storage.get(TOKEN_COOKIE);
        let user_json = self.storage.get(USER_COOKIE);
        let user = match (token, user_json) {
            (Some(_), Some(raw)) => match serde_json::from_str::<AdminUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Discarding malformed admin_user cookie");
                    self.clear_cookies();
                    None
                }
            },
            _ => None,
        };
        let mut state = self.state();
        state.user = user;
        state.loading = false;
    }

    pub fn user(&self) -> Option<AdminUser> {
        self.state().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().user.is_some()
    }

    /// Bearer token, if an unexpired one is stored.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_COOKIE)
    }

    /// Log in through the auth API and persist the session.
    pub async fn login(&self, api: &ApiClient, username: &str, password: &str) -> Result<AdminUser> {
        let response = match api.auth().login(username, password).await {
            Ok(response) => response,
            Err(Error::Api(ApiError {
                message: Some(message),
                ..
            })) => return Err(Error::Auth(message)),
            Err(e) => {
                warn!(error = %e, "Login request failed");
                return Err(Error::Auth(LOGIN_FALLBACK.into()));
            }
        };

        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
        let user_json = serde_json::to_string(&response.admin)?;
        self.storage
            .set(TOKEN_COOKIE, &response.access_token, expires_at)?;
        self.storage.set(USER_COOKIE, &user_json, expires_at)?;

        info!(username = %response.admin.username, "Admin logged in");
        let mut state = self.state();
        state.user = Some(response.admin.clone());
        state.loading = false;
        Ok(response.admin)
    }

    /// Drop the session locally. No network call is made.
    pub fn logout(&self) {
        self.clear_cookies();
        self.state().user = None;
    }

    /// Called by the API client when the server rejects the token.
    pub(crate) fn expire(&self) {
        warn!("Server rejected the session token; clearing session");
        self.logout();
    }

    fn clear_cookies(&self) {
        for name in [TOKEN_COOKIE, USER_COOKIE] {
            if let Err(e) = self.storage.remove(name) {
                warn!(cookie = name, error = %e, "Failed to remove cookie");
            }
        }
    }
}

/// Outcome of guarding a protected page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; render a neutral placeholder.
    Pending,
    /// No user; go to the login page.
    RedirectToLogin,
    /// Render the page for this user.
    Allow(AdminUser),
}

/// Client-side access check for protected pages. Cosmetic only: the server
/// enforces authorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn check(session: &SessionStore) -> GuardDecision {
        if session.is_loading() {
            return GuardDecision::Pending;
        }
        session
            .user()
            .map_or(GuardDecision::RedirectToLogin, GuardDecision::Allow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cookies::MemoryCookieJar;
    use std::sync::Arc;

    /// Jar shared between the test and the store so cookies can be inspected.
    #[derive(Clone, Default)]
    struct SharedJar(Arc<MemoryCookieJar>);

    impl CookieStorage for SharedJar {
        fn get(&self, name: &str) -> Option<String> {
            self.0.get(name)
        }
        fn set(&self, name: &str, value: &str, expires_at: chrono::DateTime<Utc>) -> Result<()> {
            self.0.set(name, value, expires_at)
        }
        fn remove(&self, name: &str) -> Result<()> {
            self.0.remove(name)
        }
    }

    fn week() -> chrono::DateTime<Utc> {
        Utc::now() + Duration::days(SESSION_TTL_DAYS)
    }

    #[test]
    fn starts_loading_until_load() {
        let store = SessionStore::in_memory();
        assert!(store.is_loading());
        assert_eq!(RouteGuard::check(&store), GuardDecision::Pending);
        store.load();
        assert!(!store.is_loading());
        assert_eq!(RouteGuard::check(&store), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn load_rehydrates_user_from_cookies() {
        let jar = SharedJar::default();
        jar.set(TOKEN_COOKIE, "tok", week()).unwrap();
        jar.set(USER_COOKIE, r#"{"id":"1","username":"admin"}"#, week())
            .unwrap();
        let store = SessionStore::new(jar);
        store.load();
        let user = store.user().unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(RouteGuard::check(&store), GuardDecision::Allow(user));
    }

    #[test]
    fn malformed_user_cookie_wipes_session() {
        let jar = SharedJar::default();
        jar.set(TOKEN_COOKIE, "tok", week()).unwrap();
        jar.set(USER_COOKIE, "{not json", week()).unwrap();
        let store = SessionStore::new(jar.clone());
        store.load();
        assert!(store.user().is_none());
        assert!(jar.get(TOKEN_COOKIE).is_none());
        assert!(jar.get(USER_COOKIE).is_none());
    }

    #[test]
    fn token_without_user_is_not_a_session() {
        let jar = SharedJar::default();
        jar.set(TOKEN_COOKIE, "tok", week()).unwrap();
        let store = SessionStore::new(jar.clone());
        store.load();
        assert!(!store.is_authenticated());
        // Left alone: only a malformed user cookie triggers a wipe.
        assert_eq!(jar.get(TOKEN_COOKIE).as_deref(), Some("tok"));
    }

    #[test]
    fn expired_cookies_are_ignored() {
        let jar = SharedJar::default();
        let past = Utc::now() - Duration::minutes(1);
        jar.set(TOKEN_COOKIE, "tok", past).unwrap();
        jar.set(USER_COOKIE, r#"{"id":"1","username":"admin"}"#, past)
            .unwrap();
        let store = SessionStore::new(jar);
        store.load();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn logout_clears_cookies_and_user() {
        let jar = SharedJar::default();
        jar.set(TOKEN_COOKIE, "tok", week()).unwrap();
        jar.set(USER_COOKIE, r#"{"id":"1","username":"admin"}"#, week())
            .unwrap();
        let store = SessionStore::new(jar.clone());
        store.load();
        store.logout();
        assert!(store.user().is_none());
        assert!(jar.get(TOKEN_COOKIE).is_none());
        assert!(jar.get(USER_COOKIE).is_none());
        assert_eq!(RouteGuard::check(&store), GuardDecision::RedirectToLogin);
    }
}
