use super::config::ApiEndpointConfig;
use super::error::{ApiError, FailureKind};
use super::interceptors::{
    attach_credential, classify_failure, classify_transport_error, decode_payload,
};
use super::notify::{LogNotifier, Notifier};
use crate::navigation::{Navigator, LOGIN_PATH};
use crate::session::Session;
use anyhow::{Context, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Authenticated client for the restaurant API.
///
/// Every call goes through [`ApiClient::send`], which attaches the stored
/// credential and handles failures uniformly: a 401 clears the session and
/// sends the user to the login screen, anything else is reported through the
/// [`Notifier`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Session,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(
        config: &ApiEndpointConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            "API client for {} (from {}, timeout {:?})",
            config.api_url,
            config.source,
            config.timeout
        );

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http,
            session,
            navigator,
            notifier: Arc::new(LogNotifier),
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send one request and return the decoded response body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = attach_credential(self.http.request(method.clone(), &url), &self.session);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", method, url, e);
                return Err(self.report(classify_transport_error(&e)));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Failed to read response body from {} {}: {}", method, url, e);
                return Err(self.report(classify_transport_error(&e)));
            }
        };

        tracing::debug!("{} {} -> {}", method, url, status);
        if status.is_success() {
            Ok(decode_payload(&bytes))
        } else {
            Err(self.report(classify_failure(status, &bytes)))
        }
    }

    /// Apply the side effects of a failure, then hand it back to the caller.
    pub(crate) fn report(&self, error: ApiError) -> ApiError {
        match &error {
            ApiError::Unauthorized => {
                tracing::warn!("Server rejected the session, clearing credential");
                self.notifier.error(error.user_message());
                self.session.invalidate();
                self.navigator.navigate(LOGIN_PATH);
            }
            ApiError::RequestFailed { message, status, kind } => {
                tracing::debug!("Request failed ({}, status {:?}): {}", kind, status, message);
                self.notifier.error(message);
            }
        }
        error
    }

    pub(crate) fn to_body<T: Serialize>(&self, value: &T) -> Result<Value, ApiError> {
        serde_json::to_value(value).map_err(|e| {
            self.report(ApiError::request_failed(
                format!("Invalid request payload: {}", e),
                None,
                FailureKind::Payload,
            ))
        })
    }

    pub(crate) fn from_body<T: DeserializeOwned>(&self, value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|e| {
            self.report(ApiError::request_failed(
                format!("Unexpected response payload: {}", e),
                None,
                FailureKind::Payload,
            ))
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}
