//! Restaurant API module.
//!
//! Provides the authenticated HTTP client and the collection calls built on it.

mod auth;
mod client;
pub mod config;
mod error;
pub mod interceptors;
mod notify;
mod resources;

pub use client::ApiClient;
pub use config::{load_api_config, ApiEndpointConfig, ConfigSource};
pub use error::{ApiError, FailureKind, FALLBACK_MESSAGE, SESSION_EXPIRED_MESSAGE};
pub use notify::{LogNotifier, Notifier};
pub use resources::CollectionCounts;
