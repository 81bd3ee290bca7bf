//! Cookie storage for the admin session.
//!
//! Cookies are name/value pairs with an absolute expiry. Expired cookies read
//! as absent. The file jar rewrites the whole file on every mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Synchronous cookie storage.
pub trait CookieStorage: Send + Sync {
    /// Value of an unexpired cookie.
    fn get(&self, name: &str) -> Option<String>;
    /// Insert or replace a cookie.
    fn set(&self, name: &str, value: &str, expires_at: DateTime<Utc>) -> Result<()>;
    /// Remove a cookie; removing an absent cookie is not an error.
    fn remove(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Jar {
    #[serde(default)]
    cookies: BTreeMap<String, StoredCookie>,
}

impl Jar {
    fn get(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        self.cookies
            .get(name)
            .filter(|c| c.expires_at > now)
            .map(|c| c.value.clone())
    }

    fn purge_expired(&mut self, now: DateTime<Utc>) {
        self.cookies.retain(|_, c| c.expires_at > now);
    }
}

fn lock(jar: &Mutex<Jar>) -> MutexGuard<'_, Jar> {
    jar.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process cookie jar.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    jar: Mutex<Jar>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStorage for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.jar).get(name, Utc::now())
    }

    fn set(&self, name: &str, value: &str, expires_at: DateTime<Utc>) -> Result<()> {
        lock(&self.jar).cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        lock(&self.jar).cookies.remove(name);
        Ok(())
    }
}

/// Cookie jar persisted as JSON.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    jar: Mutex<Jar>,
}

impl FileCookieJar {
    /// Open the jar at `path`. A missing or unreadable file yields an empty jar.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let jar = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding unreadable cookie jar");
                Jar::default()
            }),
            Err(_) => Jar::default(),
        };
        Self {
            path,
            jar: Mutex::new(jar),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, jar: &Jar) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(jar)?;
        std::fs::write(&self.path, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl CookieStorage for FileCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.jar).get(name, Utc::now())
    }

    fn set(&self, name: &str, value: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut jar = lock(&self.jar);
        jar.purge_expired(Utc::now());
        jar.cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
        self.persist(&jar)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let mut jar = lock(&self.jar);
        if jar.cookies.remove(name).is_none() {
            return Ok(());
        }
        self.persist(&jar)
    }
}
