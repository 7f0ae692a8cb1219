//! Navigation module.
//!
//! Route table, the credential guard that runs before every transition, and
//! the router that ties them together.

mod guard;
mod router;
mod routes;

pub use guard::{GuardDecision, NavigationGuard};
pub use router::{NavigationOutcome, Router};
pub use routes::{NavigationError, Route, LOGIN_PATH};

/// Something that can move the user to another screen.
///
/// The request client uses this to send the user to the login screen when
/// the server rejects the session.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
