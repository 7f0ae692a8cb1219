use super::guard::{GuardDecision, NavigationGuard};
use super::routes::{NavigationError, Route};
use super::Navigator;
use crate::session::Session;
use serde::Serialize;
use std::sync::RwLock;

/// Where a navigation attempt ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationOutcome {
    pub requested: Route,
    pub landed: Route,
    pub redirected_to_login: bool,
}

/// Tracks the current screen and runs the guard before every transition.
#[derive(Debug)]
pub struct Router {
    guard: NavigationGuard,
    current: RwLock<Route>,
}

impl Router {
    /// New router resting on the login screen.
    pub fn new(session: Session) -> Self {
        Self {
            guard: NavigationGuard::new(session),
            current: RwLock::new(Route::Login),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Navigate by path.
    pub fn push(&self, path: &str) -> Result<NavigationOutcome, NavigationError> {
        let route: Route = path.parse()?;
        Ok(self.navigate_to(route))
    }

    pub fn navigate_to(&self, requested: Route) -> NavigationOutcome {
        let destination = requested.redirect().unwrap_or(requested);

        let (landed, redirected_to_login) = match self.guard.before_navigate(destination) {
            GuardDecision::Allow => (destination, false),
            GuardDecision::Redirect(target) => (target, target == Route::Login),
        };

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = landed;

        if redirected_to_login {
            tracing::info!("Navigation to {} redirected to {}", requested, landed);
        } else {
            tracing::debug!("Navigated to {}", landed);
        }

        NavigationOutcome {
            requested,
            landed,
            redirected_to_login,
        }
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        if let Err(e) = self.push(path) {
            tracing::warn!("Ignoring navigation request: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStore;

    #[test]
    fn test_unauthenticated_navigation_lands_on_login() {
        let router = Router::new(Session::from_store(MemoryCredentialStore::new()));
        for path in ["/", "/customers", "/restaurants", "/tables", "/reservations"] {
            let outcome = router.push(path).unwrap();
            assert_eq!(outcome.landed, Route::Login, "{path}");
            assert!(outcome.redirected_to_login);
            assert_eq!(router.current(), Route::Login);
        }
    }

    #[test]
    fn test_authenticated_navigation_succeeds() {
        let router = Router::new(Session::from_store(MemoryCredentialStore::with_token("t")));
        let outcome = router.push("/reservations").unwrap();
        assert_eq!(outcome.landed, Route::Reservations);
        assert!(!outcome.redirected_to_login);
        assert_eq!(router.current(), Route::Reservations);

        let outcome = router.push("/login").unwrap();
        assert_eq!(outcome.landed, Route::Login);
        assert!(!outcome.redirected_to_login);
    }

    #[test]
    fn test_root_redirects_to_customers() {
        let router = Router::new(Session::from_store(MemoryCredentialStore::with_token("t")));
        let outcome = router.push("/").unwrap();
        assert_eq!(outcome.requested, Route::Home);
        assert_eq!(outcome.landed, Route::Customers);
        assert!(!outcome.redirected_to_login);
    }

    #[test]
    fn test_unknown_path_keeps_current_route() {
        let router = Router::new(Session::from_store(MemoryCredentialStore::with_token("t")));
        router.push("/tables").unwrap();
        assert!(router.push("/nowhere").is_err());
        assert_eq!(router.current(), Route::Tables);
    }

    #[test]
    fn test_invalidation_applies_on_next_navigation() {
        let session = Session::from_store(MemoryCredentialStore::with_token("t"));
        let router = Router::new(session.clone());
        assert_eq!(router.push("/tables").unwrap().landed, Route::Tables);

        session.invalidate();
        assert_eq!(router.push("/customers").unwrap().landed, Route::Login);
    }

    #[test]
    fn test_navigator_push_updates_current() {
        let router = Router::new(Session::from_store(MemoryCredentialStore::with_token("t")));
        router.push("/tables").unwrap();
        Navigator::navigate(&router, "/login");
        assert_eq!(router.current(), Route::Login);
    }
}
