use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("unexpected response shape from {url}: {reason}")]
    ResponseShape { url: String, reason: String },

    #[error("malformed catalog item {item_id}: {reason}")]
    MalformedRecord { item_id: String, reason: String },

    #[error("pagination limit reached for {url}: exceeded {max_pages} pages")]
    PaginationLimit { url: String, max_pages: usize },
}

impl ScraperError {
    /// Returns `true` for failures of the request itself (network errors,
    /// timeouts, non-2xx statuses) as opposed to failures in what the API sent.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_) | ScraperError::UnexpectedStatus { .. }
        )
    }
}
