//! Tablekeeper Core Library
//!
//! This crate provides the client side of the Tablekeeper restaurant tool:
//! - Authenticated API client (bearer credential, uniform failure handling)
//! - Collection calls for customers, restaurants, tables and reservations
//! - Session state backed by a pluggable credential store
//! - Navigation guard and router that gate screens on the session
//!
//! # Features
//!
//! - `keyring-storage`: Use platform keyring for credential storage
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tablekeeper_core::{api, navigation::Router, session, Customer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = session::open_default_session()?;
//!     let router = Arc::new(Router::new(session.clone()));
//!     let client = api::ApiClient::new(&api::load_api_config(), session, router.clone())?;
//!
//!     client.login("admin", "secret").await?;
//!
//!     let customers: Vec<Customer> = client.list_all().await?;
//!     println!("{} customers, now on {}", customers.len(), router.current());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod models;
pub mod navigation;
pub mod session;

// Re-export commonly used types
pub use api::{ApiClient, ApiEndpointConfig, ApiError, FailureKind, Notifier};
pub use models::{Customer, Entity, RecordId, Reservation, Resource, Restaurant, Table};
pub use navigation::{NavigationOutcome, Navigator, Route, Router};
pub use session::{CredentialStore, Session, SessionState};
