//! HTTP client wrapper for the admin API.
//!
//! Every request carries the session's bearer token when one is stored. A
//! 401 answer clears the session, notifies the [`SessionObserver`] and
//! surfaces as [`Error::SessionExpired`] regardless of the call site.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{ApiSettings, DEFAULT_API_URL};
use crate::error::{ApiError, Error, Result};
use crate::session::SessionStore;

/// Receives the "go to login" signal after the server rejects the token.
pub trait SessionObserver: Send + Sync {
    fn session_expired(&self);
}

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "<http://localhost:3000/api>").
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&ApiSettings> for ClientConfig {
    fn from(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout: settings.timeout(),
        }
    }
}

/// What a 401 means for a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnUnauthorized {
    /// Clear the session and report `SessionExpired`.
    ExpireSession,
    /// Report the 401 as an ordinary API error (used by login).
    Report,
}

/// Admin API client bound to one base URL and one session.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("API base URL is empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got {base_url}"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // reqwest is built with rustls-no-provider; `Err` means a provider is
        // already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            session,
            observer: None,
        })
    }

    /// Attach the observer notified when the session expires.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Build the absolute URL for an API path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether `url` serves an image. Used for the QR code preview; any
    /// failure reads as "not available".
    pub async fn image_available(&self, url: &str) -> bool {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return false;
        }
        match self.http.get(url).header(ACCEPT, "image/*").send().await {
            Ok(resp) => {
                let is_image = resp
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|ct| ct.starts_with("image/"));
                debug!(url, status = resp.status().as_u16(), is_image, "QR image probe");
                resp.status().is_success() && is_image
            }
            Err(e) => {
                debug!(url, error = %e, "QR image probe failed");
                false
            }
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::GET, path, None, OnUnauthorized::ExpireSession)
            .await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, body, OnUnauthorized::ExpireSession)
            .await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body), OnUnauthorized::ExpireSession)
            .await
    }

    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        on_unauthorized: OnUnauthorized,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::Config("Stored token is not a valid header value".into()))?;
            request = request.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        debug!(%method, path, status = status.as_u16(), "Admin API response");

        if status == StatusCode::UNAUTHORIZED && on_unauthorized == OnUnauthorized::ExpireSession {
            self.session.expire();
            if let Some(observer) = &self.observer {
                observer.session_expired();
            }
            return Err(Error::SessionExpired);
        }

        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(Error::Api(ApiError {
                status: status.as_u16(),
                message: error_message(&bytes),
            }));
        }

        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(payload).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })
    }
}

/// Extract the server's error text from a JSON error body.
///
/// Accepts `{"message": "..."}`, `{"message": ["...", ...]}` and
/// `{"error": "..."}`.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let message = match value.get("message") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            items.iter().find_map(|v| v.as_str().map(String::from))
        }
        _ => None,
    };
    message
        .or_else(|| value.get("error").and_then(|v| v.as_str()).map(String::from))
        .filter(|m| !m.trim().is_empty())
}

/// Percent-encode a single path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
