use std::path::PathBuf;

/// Settings for one catalog export session.
///
/// Every field is constant for the lifetime of a session; the only state that
/// changes while paging is the request offset, which lives in the scraper's
/// request body rather than here.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// GraphQL endpoint that receives the catalog POST requests.
    pub api_url: String,
    /// Storefront origin prepended to each product's relative `url`.
    pub base_url: String,
    pub store_id: u32,
    /// Category slug, e.g. `"chay"`. Also names the output file.
    pub category: String,
    /// Items requested per page; a page shorter than this ends the session.
    pub page_size: u32,
    pub query_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts per page after the first transport failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^attempt`.
    pub retry_backoff_base_ms: u64,
    pub inter_request_delay_ms: u64,
    /// Upper bound on pages fetched in one session.
    pub max_pages: usize,
}

impl ExportConfig {
    /// Path of the TSV file this session writes, `<output_dir>/<category>_results.tsv`.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_results.tsv", self.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_is_derived_from_category() {
        let config = ExportConfig {
            api_url: "https://api.example.com/graph".to_string(),
            base_url: "https://shop.example.com".to_string(),
            store_id: 10,
            category: "chay".to_string(),
            page_size: 30,
            query_path: PathBuf::from("query.txt"),
            output_dir: PathBuf::from("/tmp/out"),
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            user_agent: "test".to_string(),
            max_retries: 0,
            retry_backoff_base_ms: 0,
            inter_request_delay_ms: 0,
            max_pages: 10,
        };
        assert_eq!(
            config.output_path(),
            PathBuf::from("/tmp/out/chay_results.tsv")
        );
    }
}
