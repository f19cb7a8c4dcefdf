//! FortiOS API client.
//!
//! Low-level HTTP client that handles authentication, VDOM scoping and raw
//! requests. Higher-level operations are implemented via traits on entity
//! types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::error::{FortiError, Result};

const USER_AGENT: &str = concat!("fortiapi/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a moved entry should land relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePosition {
    /// Directly after the target entry.
    After,
    /// Directly before the target entry.
    Before,
}

impl MovePosition {
    /// The query parameter name the appliance expects.
    pub fn as_param(self) -> &'static str {
        match self {
            MovePosition::After => "after",
            MovePosition::Before => "before",
        }
    }
}

/// Low-level FortiOS API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update`, `Delete` and
/// `Reorder` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use fortiapi::FortiClient;
///
/// # fn example() -> fortiapi::Result<()> {
/// // Create from environment variables
/// let client = FortiClient::from_env()?;
///
/// // Or configure manually
/// let client = FortiClient::builder("api-token", "https://192.0.2.1")
///     .vdom("root")
///     .accept_invalid_certs(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FortiClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    vdom: Option<String>,
}

impl std::fmt::Debug for FortiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FortiClient")
            .field("base_url", &self.base_url.as_str())
            .field("vdom", &self.vdom)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FortiClient`].
#[derive(Debug, Clone)]
pub struct FortiClientBuilder {
    token: String,
    base_url: String,
    vdom: Option<String>,
    accept_invalid_certs: bool,
    timeout: Duration,
}

impl FortiClientBuilder {
    /// Scope every request to the given VDOM.
    #[must_use]
    pub fn vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Accept self-signed certificates (the appliance default).
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<FortiClient> {
        // Ensure base URL ends with /
        let base_url_str = if self.base_url.ends_with('/') {
            self.base_url
        } else {
            format!("{}/", self.base_url)
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout)
            .build()
            .map_err(FortiError::HttpError)?;

        Ok(FortiClient {
            http,
            base_url: Arc::new(base_url),
            token: self.token,
            vdom: self.vdom,
        })
    }
}

impl FortiClient {
    /// Create a client from environment variables.
    ///
    /// Uses `FORTIOS_API_TOKEN` for authentication and `FORTIOS_API_URL`
    /// for the appliance address. `FORTIOS_VDOM` scopes requests to a VDOM
    /// and `FORTIOS_INSECURE=1` accepts self-signed certificates.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or URL is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("FORTIOS_API_TOKEN").map_err(|_| {
            FortiError::ConfigMissing("FORTIOS_API_TOKEN environment variable not set".to_string())
        })?;
        let base_url = env::var("FORTIOS_API_URL").map_err(|_| {
            FortiError::ConfigMissing("FORTIOS_API_URL environment variable not set".to_string())
        })?;

        let mut builder = Self::builder(&token, &base_url);
        if let Ok(vdom) = env::var("FORTIOS_VDOM") {
            if !vdom.is_empty() {
                builder = builder.vdom(vdom);
            }
        }
        let insecure = env::var("FORTIOS_INSECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        builder.accept_invalid_certs(insecure).build()
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - REST API administrator token
    /// * `base_url` - Appliance address (e.g., `https://192.0.2.1`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Self::builder(token, base_url).build()
    }

    /// Start configuring a client.
    pub fn builder(token: &str, base_url: &str) -> FortiClientBuilder {
        FortiClientBuilder {
            token: token.to_string(),
            base_url: base_url.to_string(),
            vdom: None,
            accept_invalid_certs: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The VDOM requests are scoped to, if any.
    pub fn vdom(&self) -> Option<&str> {
        self.vdom.as_deref()
    }

    /// Return a copy of this client scoped to another VDOM.
    #[must_use]
    pub fn with_vdom(&self, vdom: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.vdom = Some(vdom.into());
        client
    }

    fn request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut request = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(vdom) = &self.vdom {
            request = request.query(&[("vdom", vdom)]);
        }
        Ok(request)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(FortiError::HttpError)?;
        Self::check_response(response).await
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        Self::send(self.request(reqwest::Method::GET, path)?).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        Self::send(self.request(reqwest::Method::GET, path)?.query(query)).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        Self::send(self.request(reqwest::Method::PUT, path)?.json(body)).await
    }

    /// Make a PUT request carrying only query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn put_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        Self::send(self.request(reqwest::Method::PUT, path)?.query(query)).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        Self::send(self.request(reqwest::Method::POST, path)?.json(body)).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        Self::send(self.request(reqwest::Method::DELETE, path)?).await
    }

    /// Relocate the entry at `path` relative to another entry of the same
    /// table.
    ///
    /// This is the only ordering primitive the appliance offers: there is no
    /// absolute position and no bulk reorder.
    #[tracing::instrument(skip(self))]
    pub async fn move_entry(
        &self,
        path: &str,
        position: MovePosition,
        target: &str,
    ) -> Result<()> {
        let query = [("action", "move"), (position.as_param(), target)];
        self.put_with_query(path, &query).await?;
        Ok(())
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FortiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(FortiError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    ///
    /// FortiOS reports failures as `{"status": "error", "error": -3,
    /// "cli_error": "..."}`; `error` is a numeric code, not text.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            for field in ["cli_error", "message", "error"] {
                match json.get(field) {
                    Some(serde_json::Value::String(msg)) if !msg.is_empty() => {
                        return msg.clone();
                    }
                    Some(serde_json::Value::Number(code)) => {
                        return format!("HTTP {status} (error code {code})");
                    }
                    _ => {}
                }
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}
