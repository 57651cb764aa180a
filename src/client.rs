//! HTTP client for the Zendesk API.
//!
//! This module provides the `ZendeskClient` struct for making authenticated,
//! rate-limited requests to the Zendesk REST API.
//!
//! # Response contract
//!
//! Every call:
//! - waits for the shared [`RateLimiter`] before touching the network
//! - attaches basic authentication when the target is the account's own host
//! - fails with `ZenklyError::Transport` on a non-2xx status
//! - fails with `ZenklyError::ResponseFormat` if the body is not JSON
//! - fails with `ZenklyError::Api` if the JSON body carries an `error` key,
//!   even on HTTP 200
//!
//! # Retry Logic
//!
//! HTTP 429 and 503 are retried up to three attempts, honoring `Retry-After`
//! (capped at 60s) when the server sends it and otherwise backing off
//! exponentially from 100ms. Every retry passes through the rate limiter again.
//!
//! # Security
//!
//! The password is never logged. Error bodies are sanitized before they are
//! stored in an error.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::Credentials;
use crate::error::ZenklyError;
use crate::rate_limit::RateLimiter;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum number of attempts for transient failures.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial delay for exponential backoff (milliseconds).
const INITIAL_BACKOFF_MS: u64 = 100;

/// Upper bound on a server-requested retry delay.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Maximum length for HTTP error response bodies kept in errors.
const MAX_ERROR_BODY_LEN: usize = 500;

/// A file upload with accompanying form fields.
///
/// Fields are sent before the file part, which storage services require.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    /// Plain form fields.
    pub fields: Vec<(String, String)>,
    /// Name of the form field carrying the file.
    pub file_field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl MultipartUpload {
    fn to_form(&self) -> Form {
        let form = self
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        form.part(self.file_field.clone(), part)
    }
}

/// Request body variants.
#[derive(Debug, Clone, Copy)]
enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Multipart(&'a MultipartUpload),
}

/// HTTP client for the Zendesk API.
///
/// Handles authentication, pacing, and response classification for all
/// API operations. Cloning is cheap and clones share the same rate limiter.
///
/// # Example
///
/// ```ignore
/// let credentials = ProfileStore::default_location().load("default")?;
/// let client = ZendeskClient::new(&credentials)?;
///
/// let body = client.get("brands.json", &[]).await?;
/// ```
#[derive(Clone)]
pub struct ZendeskClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// API root, e.g. `https://acme.zendesk.com/api/v2/`.
    base_url: Url,

    /// Agent email for basic authentication.
    email: String,

    /// Password or token for basic authentication.
    /// SECURITY: Never log this value!
    password: String,

    /// Pacing shared by every call made through this client.
    limiter: Arc<RateLimiter>,
}

impl ZendeskClient {
    /// Creates a client for the account described by `credentials`,
    /// paced at one request per second.
    ///
    /// # Errors
    ///
    /// Returns `ZenklyError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(credentials: &Credentials) -> Result<Self, ZenklyError> {
        Self::with_base_url(
            credentials.base_url()?,
            credentials,
            Arc::new(RateLimiter::default()),
        )
    }

    /// Creates a client against an explicit API root with an explicit limiter.
    pub fn with_base_url(
        base_url: Url,
        credentials: &Credentials,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, ZenklyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("zenkly/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ZenklyError::HttpClient)?;

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url),
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            limiter,
        })
    }

    /// Ensures the API root ends with `/` so relative paths join beneath it.
    fn normalize_base_url(mut url: Url) -> Url {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the API root and appends `query`.
    ///
    /// # Errors
    ///
    /// Returns `ZenklyError::Validation` if the path cannot be joined.
    pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<Url, ZenklyError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ZenklyError::validation(format!("invalid endpoint {path:?}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Returns true if `url` is on the account's own origin.
    ///
    /// Credentials are only ever sent to such URLs.
    pub fn is_account_url(&self, url: &Url) -> bool {
        url.scheme() == self.base_url.scheme()
            && url.host() == self.base_url.host()
            && url.port_or_known_default() == self.base_url.port_or_known_default()
    }

    /// Executes an operation with retry logic for transient failures.
    async fn with_retry<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, ZenklyError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ZenklyError>>,
    {
        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempts < MAX_RETRY_ATTEMPTS => {
                    let actual_delay = Self::retry_delay(&e, delay);

                    tracing::warn!(
                        operation = operation,
                        attempt = attempts,
                        max_attempts = MAX_RETRY_ATTEMPTS,
                        delay_ms = actual_delay.as_millis() as u64,
                        error = %e,
                        "Retrying after transient error"
                    );

                    tokio::time::sleep(actual_delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    if attempts > 1 {
                        tracing::debug!(
                            operation = operation,
                            attempts = attempts,
                            "All retry attempts exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Delay before the next attempt: the server's `Retry-After`, capped,
    /// or the current backoff.
    fn retry_delay(error: &ZenklyError, backoff: Duration) -> Duration {
        error
            .retry_after()
            .map_or(backoff, |requested| requested.min(MAX_RETRY_AFTER))
    }

    /// Makes one request, without retry.
    async fn request_inner(
        &self,
        method: Method,
        url: &Url,
        payload: Payload<'_>,
    ) -> Result<Value, ZenklyError> {
        let _permit = self.limiter.acquire().await;

        tracing::debug!(
            method = %method,
            path = %url.path(),
            "Making Zendesk API request"
        );

        let mut req = self.http.request(method.clone(), url.clone());

        if self.is_account_url(url) {
            req = req.basic_auth(&self.email, Some(&self.password));
        }

        req = match payload {
            Payload::Empty => req,
            Payload::Json(body) => req.json(body),
            Payload::Multipart(upload) => req.multipart(upload.to_form()),
        };

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return ZenklyError::timeout(
                    Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                    format!("{} {}", method, url.path()),
                );
            }
            ZenklyError::Http(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response).await);
        }

        let body = response.text().await.map_err(ZenklyError::Http)?;

        tracing::trace!(body = %body, "Zendesk API response");

        Self::parse_body(&body)
    }

    /// Makes a request with automatic retry for transient failures.
    async fn request(
        &self,
        method: Method,
        url: &Url,
        payload: Payload<'_>,
    ) -> Result<Value, ZenklyError> {
        let operation = format!("{} {}", method, url.path());
        self.with_retry(&operation, || {
            self.request_inner(method.clone(), url, payload)
        })
        .await
    }

    /// Parses a successful response body and checks for an embedded error.
    ///
    /// An empty body is treated as JSON `null`.
    fn parse_body(body: &str) -> Result<Value, ZenklyError> {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| ZenklyError::response_format(format!("body is not JSON: {e}"), body))?;

        match value.get("error") {
            None | Some(Value::Null) => Ok(value),
            Some(error) => Err(ZenklyError::Api {
                message: Self::embedded_error_message(error, &value),
            }),
        }
    }

    /// Renders the `error` field of a response as a message.
    ///
    /// Zendesk sends either `{"error": "Name", "description": "..."}` or
    /// `{"error": {"title": "...", "message": "..."}}`.
    fn embedded_error_message(error: &Value, body: &Value) -> String {
        match error {
            Value::String(name) => match body.get("description").and_then(Value::as_str) {
                Some(description) => format!("{name}: {description}"),
                None => name.clone(),
            },
            Value::Object(fields) => {
                let title = fields.get("title").and_then(Value::as_str);
                let message = fields.get("message").and_then(Value::as_str);
                match (title, message) {
                    (Some(title), Some(message)) => format!("{title}: {message}"),
                    (Some(text), None) | (None, Some(text)) => text.to_string(),
                    (None, None) => error.to_string(),
                }
            }
            other => other.to_string(),
        }
    }

    /// Converts a non-success response into `ZenklyError::Transport`.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> ZenklyError {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let body = ZenklyError::sanitize_message(&body, &self.password);
        let body = if body.len() > MAX_ERROR_BODY_LEN {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...[truncated]", &body[..end])
        } else {
            body
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(?retry_after, "Rate limited by Zendesk");
        }

        ZenklyError::Transport {
            status,
            body,
            retry_after,
        }
    }

    // ========================================================================
    // HTTP verbs
    // ========================================================================

    /// GETs an endpoint relative to the API root.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ZenklyError> {
        let url = self.endpoint(path, query)?;
        self.get_url(&url).await
    }

    /// GETs an absolute URL, such as a `next_page` cursor.
    pub async fn get_url(&self, url: &Url) -> Result<Value, ZenklyError> {
        self.request(Method::GET, url, Payload::Empty).await
    }

    /// PUTs a JSON body to an endpoint relative to the API root.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ZenklyError> {
        let url = self.endpoint(path, &[])?;
        self.request(Method::PUT, &url, Payload::Json(body)).await
    }

    /// POSTs a JSON body to an endpoint relative to the API root.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ZenklyError> {
        let url = self.endpoint(path, &[])?;
        self.request(Method::POST, &url, Payload::Json(body)).await
    }

    /// POSTs a multipart form to an absolute URL.
    ///
    /// Credentials are only attached if the URL is on the account's origin.
    pub async fn post_multipart(
        &self,
        url: &Url,
        upload: &MultipartUpload,
    ) -> Result<Value, ZenklyError> {
        self.request(Method::POST, url, Payload::Multipart(upload))
            .await
    }
}
