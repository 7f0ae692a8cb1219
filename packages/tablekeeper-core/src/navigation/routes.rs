use crate::models::Entity;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches path '{0}'")]
    UnknownRoute(String),
}

/// Every screen the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    /// Layout root; always redirects to [`Route::Customers`]
    Home,
    Customers,
    Restaurants,
    Tables,
    Reservations,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Home,
        Route::Customers,
        Route::Restaurants,
        Route::Tables,
        Route::Reservations,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Home => "/",
            Route::Customers => "/customers",
            Route::Restaurants => "/restaurants",
            Route::Tables => "/tables",
            Route::Reservations => "/reservations",
        }
    }

    /// Static redirect declared on the route itself.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Route::Home => Some(Route::Customers),
            _ => None,
        }
    }

    /// Only the login screen is reachable without a credential.
    pub fn requires_credential(&self) -> bool {
        !matches!(self, Route::Login)
    }

    pub fn for_entity(entity: Entity) -> Self {
        match entity {
            Entity::Customers => Route::Customers,
            Entity::Restaurants => Route::Restaurants,
            Entity::Tables => Route::Tables,
            Entity::Reservations => Route::Reservations,
        }
    }
}

impl FromStr for Route {
    type Err = NavigationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        let normalized = if normalized.is_empty() { "/" } else { normalized };

        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .ok_or_else(|| NavigationError::UnknownRoute(trimmed.to_string()))
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
