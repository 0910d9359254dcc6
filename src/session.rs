//! Session persistence.
//!
//! The session is two string values, `token` and `user`, kept in a small
//! key-value store that survives restarts. Nothing is cached in memory: every
//! read goes back to the store, so two processes sharing a file can disagree
//! until one of them re-reads.

use crate::models::UserIdentity;
use crate::token;
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Durable string-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Get the default session file
pub fn default_session_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".knowhub")
        .join("session.json")
}

/// Store backed by a single JSON object on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let entries = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(entries)
    }

    /// Replace the file via a sibling temp file, readable by the owner only.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, json.as_bytes())
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on create; a leftover temp file keeps its old bits
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!("session store unreadable: {:#}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking a fresh login
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("discarding unreadable session store: {:#}", e);
                BTreeMap::new()
            }
        };
        entries.remove(key);
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        self.write_all(&entries)
    }
}

/// In-process store, used by tests and one-off runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Session operations over a store.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The signed-in user, or None.
    ///
    /// An absent or expired token tears the whole session down. A stored
    /// identity that is missing, the literal "undefined", or not valid JSON
    /// yields None but leaves the store alone.
    pub fn current_user(&self) -> Option<UserIdentity> {
        let stored = self.store.get(TOKEN_KEY);
        let expired = stored.as_deref().map_or(true, token::is_expired);
        if expired {
            if stored.is_some() {
                tracing::debug!("stored token expired, clearing session");
            }
            if let Err(e) = self.clear_session() {
                tracing::warn!("failed to clear session: {:#}", e);
            }
            return None;
        }

        let raw = self.store.get(USER_KEY)?;
        if raw == "undefined" {
            return None;
        }
        match serde_json::from_str::<UserIdentity>(&raw) {
            Ok(user) if user.is_null() => None,
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("stored user is not valid JSON: {}", e);
                None
            }
        }
    }

    /// Raw stored token, regardless of expiry.
    pub fn token(&self) -> Option<SecretString> {
        self.store.get(TOKEN_KEY).map(SecretString::from)
    }

    /// Persist token and identity together.
    pub fn set_session(&self, token: &str, user: &UserIdentity) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user_json)?;
        Ok(())
    }

    /// Raw token and identity strings as stored, without validation.
    pub fn load_session(&self) -> Option<(String, String)> {
        Some((self.store.get(TOKEN_KEY)?, self.store.get(USER_KEY)?))
    }

    pub fn clear_session(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }
}
