//! Shared wiring for subcommands and the TUI: settings, session, API client.

use std::sync::Arc;

use tracing::debug;
use walletdesk_core::cookies::{FileCookieJar, MemoryCookieJar};
use walletdesk_core::models::AdminUser;
use walletdesk_core::{
    ApiClient, ClientConfig, Error, GuardDecision, RouteGuard, SessionStore, Settings,
};

pub const NOT_LOGGED_IN: &str = "Not logged in. Run: walletdesk auth login";
pub const SESSION_EXPIRED_HINT: &str = "Session expired. Run: walletdesk auth login";

/// Prefix a failed backend call for the user. An expired session stays a
/// typed error so [`with_login_hint`] still recognises it.
pub fn action_error(prefix: &str, err: Error) -> anyhow::Error {
    match err {
        Error::SessionExpired => err.into(),
        other => anyhow::anyhow!("{prefix}: {}", other.user_message()),
    }
}

/// Tell the user how to recover from a rejected session.
pub fn with_login_hint(err: anyhow::Error) -> anyhow::Error {
    if matches!(err.downcast_ref::<Error>(), Some(Error::SessionExpired)) {
        anyhow::anyhow!(SESSION_EXPIRED_HINT)
    } else {
        err
    }
}

/// Everything a command needs to talk to the backend.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    pub api: ApiClient,
}

impl Context {
    /// Open the cookie jar, rehydrate the session and build the client.
    pub fn open(settings: Settings) -> anyhow::Result<Self> {
        let session = match settings.session.cookie_path() {
            Some(path) => {
                debug!(path = %path.display(), "Using cookie jar");
                SessionStore::new(FileCookieJar::open(path))
            }
            None => SessionStore::new(MemoryCookieJar::new()),
        };
        session.load();
        Self::with_session(settings, Arc::new(session))
    }

    pub fn with_session(settings: Settings, session: Arc<SessionStore>) -> anyhow::Result<Self> {
        let api = ApiClient::new(&ClientConfig::from(&settings.api), session)?;
        Ok(Self { settings, api })
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    /// The logged-in admin, or an error telling the user to log in.
    pub fn require_login(&self) -> anyhow::Result<AdminUser> {
        match RouteGuard::check(self.session()) {
            GuardDecision::Allow(user) => Ok(user),
            GuardDecision::Pending | GuardDecision::RedirectToLogin => {
                anyhow::bail!(NOT_LOGGED_IN)
            }
        }
    }
}
