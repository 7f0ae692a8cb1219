use super::routes::Route;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Cancel the transition and go here instead
    Redirect(Route),
}

/// Gates route transitions on the presence of a stored credential.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: Session,
}

impl NavigationGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Runs before every transition. The credential is re-read each time, so
    /// an invalidation takes effect on the very next navigation.
    pub fn before_navigate(&self, destination: Route) -> GuardDecision {
        if !destination.requires_credential() {
            return GuardDecision::Allow;
        }

        if self.session.credential().is_none() {
            tracing::debug!("No credential stored, redirecting {} to login", destination);
            return GuardDecision::Redirect(Route::Login);
        }

        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStore;

    #[test]
    fn test_login_always_allowed() {
        let guard = NavigationGuard::new(Session::from_store(MemoryCredentialStore::new()));
        assert_eq!(guard.before_navigate(Route::Login), GuardDecision::Allow);
    }

    #[test]
    fn test_protected_routes_redirect_without_credential() {
        let guard = NavigationGuard::new(Session::from_store(MemoryCredentialStore::new()));
        for route in Route::ALL.into_iter().filter(Route::requires_credential) {
            assert_eq!(
                guard.before_navigate(route),
                GuardDecision::Redirect(Route::Login),
                "{route} should be guarded"
            );
        }
    }

    #[test]
    fn test_every_route_allowed_with_credential() {
        let guard =
            NavigationGuard::new(Session::from_store(MemoryCredentialStore::with_token("t")));
        for route in Route::ALL {
            assert_eq!(guard.before_navigate(route), GuardDecision::Allow);
        }
    }

    #[test]
    fn test_decision_is_not_cached() {
        let session = Session::from_store(MemoryCredentialStore::with_token("t"));
        let guard = NavigationGuard::new(session.clone());
        assert_eq!(guard.before_navigate(Route::Tables), GuardDecision::Allow);

        session.invalidate();
        assert_eq!(
            guard.before_navigate(Route::Tables),
            GuardDecision::Redirect(Route::Login)
        );
    }
}
