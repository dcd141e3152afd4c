//! API Client
//!
//! Every backend call goes through [`ApiClient`]. It reads the access token
//! from the session immediately before dispatch, attaches it as a bearer
//! token, and applies the one global error rule: a 401 from any endpoint
//! clears the session and sends the user to the login view.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::app::config::Config;
use crate::app::routes::{Navigator, Route};
use crate::app::session::{Epoch, SessionStore};
use crate::shared::ApiError;

/// Authenticated HTTP client for the campus backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    http: Client,
    session: Arc<SessionStore>,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(config: Config, session: Arc<SessionStore>, navigator: Navigator) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(config.user_agent()).build()?;
        Ok(Self::with_http(config, http, session, navigator))
    }

    /// Use a preconfigured `reqwest::Client`
    pub fn with_http(config: Config, http: Client, session: Arc<SessionStore>, navigator: Navigator) -> Self {
        Self {
            config,
            http,
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Request builder for `path` under the configured base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.api_url(path))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path).multipart(form)).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        self.execute(self.request(Method::PUT, path).multipart(form)).await
    }

    /// DELETE; any success status, body ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Send `request` and decode a JSON success body
    pub async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            tracing::error!("Failed to decode response body: {}", err);
            ApiError::Decode(err)
        })
    }

    /// Attach the bearer token, send, and map non-success statuses to errors.
    ///
    /// Returns the response only for 2xx statuses.
    pub async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let (token, epoch) = self.session.bearer();
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(%method, path = url.path(), "Dispatching request");

        let response = self.http.execute(request).await.map_err(|err| {
            tracing::error!(%method, path = url.path(), "Request failed: {}", err);
            ApiError::Network(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, error_body(&text));
        tracing::warn!(%method, path = url.path(), %status, "Request rejected: {}", error);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(epoch).await;
        }

        Err(error)
    }

    /// Clear the session the request was sent under, at most once
    async fn handle_unauthorized(&self, epoch: Epoch) {
        if self.session.clear_if(epoch).await {
            tracing::warn!("Backend rejected the session, signing out");
            self.navigator.navigate(Route::Login);
        } else {
            tracing::debug!("Ignoring 401 for a superseded session");
        }
    }
}

/// Parsed error body: JSON when it parses, else the raw text
fn error_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
