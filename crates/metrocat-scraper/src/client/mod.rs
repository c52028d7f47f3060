//! HTTP client for the catalog GraphQL endpoint.

use std::time::Duration;

use metrocat_core::ExportConfig;
use reqwest::Client;
use serde_json::Value;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::request::CatalogRequest;

/// HTTP client for the catalog products API.
///
/// Owns one `reqwest` connection pool. Non-2xx responses surface as
/// [`ScraperError::UnexpectedStatus`]; those and network failures are retried
/// with exponential backoff up to `max_retries` additional attempts per page.
pub struct CatalogClient {
    client: Client,
    api_url: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff: `backoff_base_ms * 2^attempt`.
    backoff_base_ms: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// transport failure. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        api_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the session configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &ExportConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// POSTs one page request and returns the raw `data.category.products`
    /// items, retrying transport failures.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: network or TLS failure after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`]: non-2xx status after all retries exhausted.
    /// - [`ScraperError::ResponseShape`]: body is not JSON or lacks the
    ///   products array (not retried).
    pub async fn fetch_page(&self, request: &CatalogRequest) -> Result<Vec<Value>, ScraperError> {
        let url = self.api_url.as_str();
        let offset = request.offset();

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            tracing::debug!(url, offset, "requesting catalog page");

            let response = self
                .client
                .post(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(request)
                .send()
                .await?;
            let status = response.status();

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            extract_products(&body, url)
        })
        .await
    }
}

/// Pulls the `data.category.products` array out of a response body.
///
/// # Errors
///
/// Returns [`ScraperError::ResponseShape`] if the body is not JSON or the
/// path does not lead to an array.
fn extract_products(body: &str, url: &str) -> Result<Vec<Value>, ScraperError> {
    let shape_error = |reason: String| ScraperError::ResponseShape {
        url: url.to_owned(),
        reason,
    };

    let mut parsed: Value =
        serde_json::from_str(body).map_err(|e| shape_error(format!("invalid JSON: {e}")))?;

    match parsed.pointer_mut("/data/category/products").map(Value::take) {
        Some(Value::Array(products)) => Ok(products),
        Some(other) => Err(shape_error(format!(
            "data.category.products is not an array (found {})",
            json_kind(&other)
        ))),
        None => Err(shape_error("missing data.category.products".to_owned())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
