//! Credential storage backends.
//!
//! The credential is a single opaque bearer token kept under the fixed key
//! [`TOKEN_KEY`]. Backends:
//! 1. In-memory (tests, embedding)
//! 2. File-based key-value store (always available)
//! 3. Platform keyring with file fallback (`keyring-storage` feature)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

#[cfg(feature = "keyring-storage")]
use keyring::Entry;

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "token";

/// File name of the key-value session file inside the config directory
const SESSION_FILE: &str = "session.json";

/// Service name used for keyring storage
#[cfg(feature = "keyring-storage")]
const KEYRING_SERVICE: &str = "tablekeeper";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credential file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("Credential store lock poisoned")]
    Poisoned,

    #[cfg(feature = "keyring-storage")]
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// A process-wide key-value slot holding the bearer credential.
///
/// `remove` must succeed when nothing is stored.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, StoreError>;
    fn set(&self, token: &str) -> Result<(), StoreError>;
    fn remove(&self) -> Result<(), StoreError>;

    /// Human-readable description of where credentials live
    fn describe(&self) -> String;
}

// ============================================================================
// In-memory storage
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        let guard = self.token.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        let mut guard = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "In-memory storage".to_string()
    }
}

// ============================================================================
// File-based storage
// ============================================================================

/// On-disk layout: a flat JSON object of string entries.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct SessionFile {
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

/// Get the tablekeeper config directory
pub fn config_dir() -> Result<PathBuf, StoreError> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .ok_or(StoreError::NoConfigDir)?;
    Ok(base.join("tablekeeper"))
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located at `~/.config/tablekeeper/session.json`
    pub fn default_location() -> Result<Self, StoreError> {
        Ok(Self::new(config_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<SessionFile, StoreError> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(SessionFile::default());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_file(&self, file: &SessionFile) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(file).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut handle = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .map_err(io_err)?;
            handle.write_all(json.as_bytes()).map_err(io_err)?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, &json).map_err(io_err)?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        let file = self.read_file()?;
        Ok(file.entries.get(TOKEN_KEY).cloned())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut file = match self.read_file() {
            Ok(file) => file,
            Err(StoreError::Parse { path, source }) => {
                tracing::warn!("Overwriting unreadable credential file {:?}: {}", path, source);
                SessionFile::default()
            }
            Err(e) => return Err(e),
        };
        file.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_file(&file)?;
        tracing::debug!("Credential saved to file: {:?}", self.path);
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut file = match self.read_file() {
            Ok(file) => file,
            Err(StoreError::Parse { path, source }) => {
                tracing::warn!("Deleting unreadable credential file {:?}: {}", path, source);
                return fs::remove_file(&path).map_err(|source| StoreError::Io { path, source });
            }
            Err(e) => return Err(e),
        };
        if file.entries.remove(TOKEN_KEY).is_some() {
            self.write_file(&file)?;
            tracing::debug!("Credential removed from file: {:?}", self.path);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("File-based storage: {}", self.path.display())
    }
}

// ============================================================================
// Keyring-based storage (optional, platform-specific)
// ============================================================================

#[cfg(feature = "keyring-storage")]
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    fallback: FileCredentialStore,
}

#[cfg(feature = "keyring-storage")]
impl KeyringCredentialStore {
    pub fn new(fallback: FileCredentialStore) -> Self {
        Self { fallback }
    }

    fn entry() -> Result<Entry, StoreError> {
        Entry::new(KEYRING_SERVICE, TOKEN_KEY).map_err(|e| {
            tracing::error!(
                "Failed to create keyring entry (service='{}', user='{}'): {}",
                KEYRING_SERVICE,
                TOKEN_KEY,
                e
            );
            StoreError::Keyring(e)
        })
    }
}

#[cfg(feature = "keyring-storage")]
impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        let entry = match Self::entry() {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Keyring unavailable for reading: {}, trying file fallback", e);
                return self.fallback.get();
            }
        };

        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => self.fallback.get(),
            Err(e) => {
                tracing::warn!("Failed to read keyring: {}, trying file fallback", e);
                self.fallback.get()
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let entry = match Self::entry() {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Keyring unavailable for saving: {}, using file storage", e);
                return self.fallback.set(token);
            }
        };

        if let Err(e) = entry.set_password(token) {
            tracing::warn!("Failed to save credential to keyring: {}, using file storage", e);
            return self.fallback.set(token);
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        // Always clear the file as well
        self.fallback.remove()?;

        let entry = Self::entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                // An empty token reads back as no credential
                tracing::warn!("Failed to delete keyring entry: {}, blanking it instead", e);
                entry.set_password("").map_err(StoreError::Keyring)
            }
        }
    }

    fn describe(&self) -> String {
        #[cfg(target_os = "windows")]
        let backend = "Windows Credential Manager";
        #[cfg(target_os = "macos")]
        let backend = "macOS Keychain";
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let backend = "Linux Secret Service (GNOME Keyring/KWallet)";

        format!("{} (with file fallback: {})", backend, self.fallback.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));

        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_is_idempotent() {
        let store = MemoryCredentialStore::with_token("abc");
        store.remove().unwrap();
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_means_no_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        assert_eq!(store.get().unwrap(), None);
        store.remove().unwrap();
    }

    #[test]
    fn test_file_store_persists_under_token_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileCredentialStore::new(&path);

        store.set("jwt-value").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "jwt-value");

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get().unwrap().as_deref(), Some("jwt-value"));
    }

    #[test]
    fn test_file_store_remove_keeps_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token":"t","theme":"dark"}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        store.remove().unwrap();
        store.remove().unwrap();

        assert_eq!(store.get().unwrap(), None);
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileCredentialStore::new(&path).set("secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.get(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token": "abc""#).unwrap();

        let store = FileCredentialStore::new(&path);
        store.set("fresh").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("fresh"));

        fs::write(&path, r#"{"token": "abc""#).unwrap();
        store.remove().unwrap();
        assert!(!path.exists());
        assert_eq!(store.get().unwrap(), None);
    }
}
