use super::client::ApiClient;
use super::error::{ApiError, FailureKind};
use crate::models::{AuthResponse, LoginRequest};
use crate::navigation::{Route, LOGIN_PATH};
use reqwest::Method;

const LOGIN_ENDPOINT: &str = "/auth/login";

impl ApiClient {
    /// Exchange username and password for a credential and store it.
    ///
    /// On success the user is sent to the home route. A rejected login comes
    /// back as [`ApiError::Unauthorized`] like any other 401.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = self.to_body(&request)?;

        let value = self.send(Method::POST, LOGIN_ENDPOINT, Some(&body)).await?;
        let auth: AuthResponse = self.from_body(value)?;

        if auth.token.trim().is_empty() {
            return Err(self.report(ApiError::request_failed(
                "Login response did not contain a token",
                None,
                FailureKind::Payload,
            )));
        }

        if let Err(e) = self.session().store_credential(&auth.token) {
            tracing::error!("Failed to persist credential: {:#}", e);
            return Err(self.report(ApiError::request_failed(
                format!("Failed to save credential: {}", e),
                None,
                FailureKind::Storage,
            )));
        }

        tracing::info!("Logged in as {}", username);
        self.notifier().success("Login successful");
        self.navigator().navigate(Route::Home.path());
        Ok(())
    }

    /// Forget the credential and return to the login screen.
    pub fn logout(&self) {
        self.session().invalidate();
        self.navigator().navigate(LOGIN_PATH);
    }
}
