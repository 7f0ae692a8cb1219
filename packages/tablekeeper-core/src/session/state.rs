use super::credentials::CredentialStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Whether a credential is currently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unauthenticated => write!(f, "unauthenticated"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Shared handle to the session credential.
///
/// Cloning is cheap; every clone points at the same store. The credential is
/// read from the store on every call, so an invalidation by one holder is
/// seen by the next read from any other.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn from_store<S: CredentialStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// Current bearer credential, if any.
    ///
    /// Read failures are logged and reported as no credential.
    pub fn credential(&self) -> Option<String> {
        match self.store.get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored credential: {}", e);
                None
            }
        }
    }

    pub fn state(&self) -> SessionState {
        if self.credential().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Persist a freshly issued credential.
    pub fn store_credential(&self, token: &str) -> anyhow::Result<()> {
        self.store.set(token)?;
        tracing::info!("Session credential stored");
        Ok(())
    }

    /// Drop the stored credential. Safe to call any number of times.
    pub fn invalidate(&self) {
        match self.store.remove() {
            Ok(()) => tracing::info!("Session credential cleared"),
            Err(e) => tracing::warn!("Failed to clear stored credential: {}", e),
        }
    }

    pub fn storage_info(&self) -> String {
        self.store.describe()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("storage", &self.store.describe())
            .field("state", &self.state())
            .finish()
    }
}
