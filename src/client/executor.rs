//! # Request Executor
//!
//! The one place network calls happen. The executor owns the shared
//! `reqwest` client, builds requests from a [`RequestSpec`], applies the
//! per-class timeout, decodes the response envelope, and classifies every
//! failure into an [`ApiError`].
//!
//! Failure policies live here too, so call sites stay consistent:
//! - `run_critical*`: on failure, surface a user notification through the
//!   [`Notifier`] seam, then propagate the typed error
//! - `run_best_effort` / `best_effort_fallback`: on failure, log and hand
//!   back a safe default so secondary features degrade instead of crashing

use crate::client::notify::{Notification, Notifier};
use crate::core::config::{ClientConfig, TimeoutConfig};
use crate::core::error::{ApiError, ApiResult};
use crate::core::types::{ApiEnvelope, Page};
use reqwest::header::RETRY_AFTER;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Which timeout budget a request draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    /// Typeahead suggestion lookups (short budget)
    Suggestion,

    /// Search and listing calls
    Listing,

    /// File uploads (CVs, logos, banners)
    Upload,
}

impl TimeoutClass {
    /// Resolve the configured duration for this class
    pub fn duration(&self, timeouts: &TimeoutConfig) -> Duration {
        match self {
            Self::Suggestion => timeouts.suggestion,
            Self::Listing => timeouts.listing,
            Self::Upload => timeouts.upload,
        }
    }
}

/// A network operation, described independently of the HTTP client
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,

    /// Path relative to the configured base URL, e.g. "posts/P1/comments"
    pub path: String,

    /// Query parameters
    pub query: Vec<(String, String)>,

    /// JSON body for mutating requests
    pub body: Option<Value>,

    /// Timeout budget
    pub timeout_class: TimeoutClass,
}

impl RequestSpec {
    /// A GET request with the listing timeout
    pub fn get<P: Into<String>>(path: P) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout_class: TimeoutClass::Listing,
        }
    }

    /// A POST request with a JSON body
    pub fn post<P: Into<String>>(path: P, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            timeout_class: TimeoutClass::Listing,
        }
    }

    /// A PUT request with a JSON body
    pub fn put<P: Into<String>>(path: P, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            timeout_class: TimeoutClass::Listing,
        }
    }

    /// A DELETE request
    pub fn delete<P: Into<String>>(path: P) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout_class: TimeoutClass::Listing,
        }
    }

    /// Add a query parameter
    pub fn with_query<V: Display>(mut self, name: &str, value: V) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter when present
    pub fn with_opt_query<V: Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_query(name, v),
            None => self,
        }
    }

    /// Override the timeout class
    pub fn with_timeout_class(mut self, class: TimeoutClass) -> Self {
        self.timeout_class = class;
        self
    }
}

/// Executes [`RequestSpec`]s against the backend
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: Url,
    timeouts: TimeoutConfig,
    notifier: Arc<dyn Notifier>,
}

impl RequestExecutor {
    /// Build an executor from validated configuration
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.parsed_base_url()?,
            timeouts: config.timeouts,
            notifier,
        })
    }

    /// Resolve a relative path against the base URL
    fn build_url(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send the request and decode the envelope, requiring a payload
    pub async fn execute<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiResult<T> {
        let envelope = self.send(spec).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::unknown("successful response carried no data"))
    }

    /// Send the request and assemble a [`Page`] from the envelope's data
    /// and pagination fields
    pub async fn execute_page<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiResult<Page<T>> {
        let envelope: ApiEnvelope<Vec<T>> = self.send(spec).await?;
        let items = envelope
            .data
            .ok_or_else(|| ApiError::unknown("successful response carried no data"))?;
        Ok(Page {
            items,
            pagination: envelope.pagination,
        })
    }

    /// Send the request, accepting a success envelope without data
    pub async fn execute_no_content(&self, spec: RequestSpec) -> ApiResult<()> {
        let _: ApiEnvelope<Value> = self.send(spec).await?;
        Ok(())
    }

    /// Critical policy: notify the user, then propagate the typed error
    pub async fn run_critical<T: DeserializeOwned>(
        &self,
        label: &str,
        spec: RequestSpec,
    ) -> ApiResult<T> {
        match self.execute(spec).await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.notify_failure(label, err).await),
        }
    }

    /// Critical policy for paged reads
    pub async fn run_critical_page<T: DeserializeOwned>(
        &self,
        label: &str,
        spec: RequestSpec,
    ) -> ApiResult<Page<T>> {
        match self.execute_page(spec).await {
            Ok(page) => Ok(page),
            Err(err) => Err(self.notify_failure(label, err).await),
        }
    }

    /// Critical policy for operations without a response payload
    pub async fn run_critical_no_content(&self, label: &str, spec: RequestSpec) -> ApiResult<()> {
        match self.execute_no_content(spec).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.notify_failure(label, err).await),
        }
    }

    /// Best-effort policy: on failure, log and return `default`
    pub async fn run_best_effort<T: DeserializeOwned>(
        &self,
        label: &str,
        spec: RequestSpec,
        default: T,
    ) -> T {
        match self.execute(spec).await {
            Ok(value) => value,
            Err(err) => self.best_effort_fallback(label, err, default),
        }
    }

    /// The best-effort failure path, shared by call sites that need to act
    /// on success (e.g. cache it) before defaulting
    pub fn best_effort_fallback<T>(&self, label: &str, err: ApiError, default: T) -> T {
        warn!(operation = label, error = %err, "best-effort call failed, using default");
        default
    }

    async fn notify_failure(&self, label: &str, err: ApiError) -> ApiError {
        self.notifier
            .notify(Notification::new(
                format!("{} failed", label),
                err.user_message(),
            ))
            .await;
        err
    }

    /// Perform the HTTP exchange and return the decoded envelope
    async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiResult<ApiEnvelope<T>> {
        let url = self.build_url(&spec.path)?;
        let request_id = Uuid::new_v4();
        let timeout = spec.timeout_class.duration(&self.timeouts);

        let mut request = self
            .http
            .request(spec.method.clone(), url)
            .timeout(timeout)
            .header("X-Request-Id", request_id.to_string());

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        debug!(
            %request_id,
            method = %spec.method,
            path = %spec.path,
            timeout_ms = timeout.as_millis() as u64,
            "sending request"
        );

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());

            // The error body is often still an envelope; mine it for the
            // message and field errors before classifying.
            let body = response.text().await.unwrap_or_default();
            let (message, errors) = match serde_json::from_str::<ApiEnvelope<Value>>(&body) {
                Ok(envelope) => (envelope.message, envelope.errors),
                Err(_) => (None, Vec::new()),
            };

            let mut err = ApiError::from_status(status, message, errors);
            if let ApiError::RateLimited { retry_after_secs } = &mut err {
                *retry_after_secs = retry_after;
            }

            warn!(%request_id, %status, error = %err, "request failed");
            return Err(err);
        }

        let envelope: ApiEnvelope<T> = response.json().await.map_err(ApiError::from)?;

        if !envelope.success {
            // 200 with success=false classifies from the body.
            let err = if envelope.message.is_some() || !envelope.errors.is_empty() {
                ApiError::from_status(StatusCode::BAD_REQUEST, envelope.message, envelope.errors)
            } else {
                ApiError::unknown("backend reported failure without detail")
            };
            warn!(%request_id, error = %err, "backend rejected request");
            return Err(err);
        }

        Ok(envelope)
    }
}
