//! Session module for Tablekeeper clients.
//!
//! Holds the bearer credential and the session state derived from it.

mod credentials;
mod state;

#[cfg(feature = "keyring-storage")]
pub use credentials::KeyringCredentialStore;
pub use credentials::{
    config_dir, CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError,
    TOKEN_KEY,
};
pub use state::{Session, SessionState};

/// Open the session backed by the default storage for this build.
///
/// Uses the platform keyring when `keyring-storage` is enabled, otherwise the
/// session file in the user config directory.
pub fn open_default_session() -> Result<Session, StoreError> {
    let file_store = FileCredentialStore::default_location()?;

    #[cfg(feature = "keyring-storage")]
    let session = Session::from_store(KeyringCredentialStore::new(file_store));

    #[cfg(not(feature = "keyring-storage"))]
    let session = Session::from_store(file_store);

    Ok(session)
}
