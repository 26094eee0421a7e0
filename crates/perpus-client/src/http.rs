//! # HTTP Collaborator
//!
//! One `reqwest::Client`, configured once with the base URL, the timeout and
//! the default JSON headers. Stores only ever go through [`ApiClient`].
//!
//! ## Request Flow
//! ```text
//! Store method
//!      │  path, bearer token?, RequestBody
//!      ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ ApiClient::send                                          │
//! │  base_url + path                                         │
//! │  Content-Type: application/json   (multipart overrides)  │
//! │  Accept: application/json                                │
//! │  Authorization: Bearer <token>    (when given)           │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │
//!            2xx ────────────┼──────────── non-2xx
//!             │                              │
//!             ▼                              ▼
//!     serde_json::from_str::<T>   ClientError::{Api, Validation}
//! ```

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use perpus_core::User;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{ "data": ... }` envelope used by every resource endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{ "user": ... }` envelope of `/me` and `/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of endpoints that only acknowledge (logout, delete).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Request Body
// =============================================================================

/// What a request carries.
#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Replaces the default JSON content type with multipart/form-data.
    Multipart(Form),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ClientResult<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }
}

// =============================================================================
// API Client
// =============================================================================

/// The process-wide HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds the client from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(ApiClient {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Shorthand for a default configuration pointing at `base_url`.
    pub fn with_base_url(base_url: &str) -> ClientResult<Self> {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Ok(Url::parse(&joined)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        self.send(Method::GET, path, &[], token, RequestBody::Empty)
            .await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: RequestBody,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, &[], token, body).await
    }

    /// POST with query parameters (used for `_method` overrides).
    pub async fn post_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
        body: RequestBody,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, query, token, body).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: RequestBody,
    ) -> ClientResult<T> {
        self.send(Method::PUT, path, &[], token, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        self.send(Method::DELETE, path, &[], token, RequestBody::Empty)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
        body: RequestBody,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        debug!(%method, %url, authorized = token.is_some(), "API request");

        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, path, status = status.as_u16(), "API response");

        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), &text));
        }

        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}
