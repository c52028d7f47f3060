//! Offset pagination over a catalog category.
//!
//! The API pages by `variables.from` (items to skip) and `variables.size`
//! (items per page). There is no total count or next-page marker: a page
//! holding fewer than `size` items is the last one.
//!
//! [`CatalogPages`] drives that loop one page per [`CatalogPages::next_batch`]
//! call and tracks how the session ended:
//!
//! ```text
//! Fetching ──full page──▶ Fetching
//!    │
//!    ├──short page──────▶ Exhausted
//!    ├──retries spent───▶ Aborted
//!    └──fatal error─────▶ Failed
//! ```

use std::time::Duration;

use metrocat_core::{ExportConfig, NormalizedRecord};

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::normalize::normalize_page;
use crate::request::CatalogRequest;

/// Default cap on pages per session. Prevents an endless loop if the API
/// keeps returning full pages past the end of the category.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Where a [`CatalogPages`] session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStatus {
    /// More pages may follow.
    Fetching,
    /// The last page was short; every item was retrieved.
    Exhausted,
    /// A page kept failing at the transport level until the retry budget ran
    /// out. Batches yielded before it are valid but the category is incomplete.
    Aborted,
    /// A fatal error was returned from [`CatalogPages::next_batch`].
    Failed,
}

impl RetrievalStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, RetrievalStatus::Fetching)
    }
}

impl std::fmt::Display for RetrievalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalStatus::Fetching => write!(f, "fetching"),
            RetrievalStatus::Exhausted => write!(f, "exhausted"),
            RetrievalStatus::Aborted => write!(f, "aborted"),
            RetrievalStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Single-pass cursor over the pages of one category.
///
/// Owns the [`CatalogClient`] and its connection pool for the whole session;
/// dropping the cursor early releases both. A finished cursor cannot be
/// restarted; build a new one with a fresh request to read the category again.
pub struct CatalogPages {
    client: CatalogClient,
    request: CatalogRequest,
    base_url: String,
    page_size: u32,
    inter_request_delay_ms: u64,
    max_pages: usize,
    pages_fetched: usize,
    status: RetrievalStatus,
    last_transport_error: Option<ScraperError>,
}

impl CatalogPages {
    /// Creates a cursor starting at the request's current offset. The page
    /// size is the request's `variables.size`.
    #[must_use]
    pub fn new(client: CatalogClient, request: CatalogRequest, base_url: &str) -> Self {
        let page_size = request.variables.size;
        Self {
            client,
            request,
            base_url: base_url.to_owned(),
            page_size,
            inter_request_delay_ms: 0,
            max_pages: DEFAULT_MAX_PAGES,
            pages_fetched: 0,
            status: RetrievalStatus::Fetching,
            last_transport_error: None,
        }
    }

    /// Creates a cursor with pacing and page limit taken from the session
    /// configuration.
    #[must_use]
    pub fn from_config(
        client: CatalogClient,
        request: CatalogRequest,
        config: &ExportConfig,
    ) -> Self {
        Self::new(client, request, &config.base_url)
            .with_inter_request_delay(config.inter_request_delay_ms)
            .with_max_pages(config.max_pages)
    }

    /// Sleep this long before every page request except the first.
    #[must_use]
    pub fn with_inter_request_delay(mut self, delay_ms: u64) -> Self {
        self.inter_request_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn status(&self) -> RetrievalStatus {
        self.status
    }

    /// Offset the next request would use.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.request.offset()
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The transport error that ended an [`RetrievalStatus::Aborted`] session.
    #[must_use]
    pub fn last_transport_error(&self) -> Option<&ScraperError> {
        self.last_transport_error.as_ref()
    }

    /// Fetches and normalizes the next page.
    ///
    /// Returns `Ok(Some(batch))` for every page retrieved, including a final
    /// short or empty one, and `Ok(None)` once the session is over. Transport
    /// failures that outlast the retry budget end the session quietly with
    /// [`RetrievalStatus::Aborted`]; check [`Self::status`] to tell that apart
    /// from [`RetrievalStatus::Exhausted`].
    ///
    /// The offset advances only after a full page, so after a short page it
    /// still points at the start of that page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::ResponseShape`]: the API answered with an unexpected body.
    /// - [`ScraperError::MalformedRecord`]: an item lacked required fields.
    /// - [`ScraperError::PaginationLimit`]: more than `max_pages` pages.
    ///
    /// Any error moves the cursor to [`RetrievalStatus::Failed`].
    pub async fn next_batch(&mut self) -> Result<Option<Vec<NormalizedRecord>>, ScraperError> {
        if self.status.is_terminal() {
            return Ok(None);
        }

        if self.pages_fetched >= self.max_pages {
            self.status = RetrievalStatus::Failed;
            return Err(ScraperError::PaginationLimit {
                url: self.client.api_url().to_owned(),
                max_pages: self.max_pages,
            });
        }

        if self.pages_fetched > 0 && self.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
        }

        let products = match self.client.fetch_page(&self.request).await {
            Ok(products) => products,
            Err(err) if err.is_transport() => {
                tracing::warn!(
                    offset = self.offset(),
                    pages_fetched = self.pages_fetched,
                    error = %err,
                    "retry budget exhausted, stopping retrieval"
                );
                self.status = RetrievalStatus::Aborted;
                self.last_transport_error = Some(err);
                return Ok(None);
            }
            Err(err) => {
                self.status = RetrievalStatus::Failed;
                return Err(err);
            }
        };

        let batch = match normalize_page(products, &self.base_url) {
            Ok(batch) => batch,
            Err(err) => {
                self.status = RetrievalStatus::Failed;
                return Err(err);
            }
        };

        self.pages_fetched += 1;
        let offset = self.offset();

        if batch.len() == self.page_size as usize {
            self.request.advance(self.page_size);
        } else {
            self.status = RetrievalStatus::Exhausted;
        }

        tracing::info!(
            offset,
            records = batch.len(),
            page = self.pages_fetched,
            status = %self.status,
            "catalog page retrieved"
        );

        Ok(Some(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fetching_is_non_terminal() {
        assert!(!RetrievalStatus::Fetching.is_terminal());
        assert!(RetrievalStatus::Exhausted.is_terminal());
        assert!(RetrievalStatus::Aborted.is_terminal());
        assert!(RetrievalStatus::Failed.is_terminal());
    }

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(RetrievalStatus::Exhausted.to_string(), "exhausted");
        assert_eq!(RetrievalStatus::Aborted.to_string(), "aborted");
    }
}
