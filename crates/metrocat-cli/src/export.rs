//! Export pipeline: query template → paged retrieval → TSV file.
//!
//! Each batch is flushed to disk as soon as it arrives, so a run that stops
//! early (fatal error or retry exhaustion) still leaves a valid TSV prefix.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use metrocat_core::ExportConfig;
use metrocat_scraper::{CatalogClient, CatalogPages, CatalogRequest, RetrievalStatus};

use crate::tsv::TsvWriter;

/// Outcome of one export run.
#[derive(Debug)]
pub(crate) struct ExportSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub records: usize,
    /// [`RetrievalStatus::Exhausted`] for a complete export,
    /// [`RetrievalStatus::Aborted`] when a page could not be fetched.
    pub status: RetrievalStatus,
}

impl ExportSummary {
    pub(crate) fn is_complete(&self) -> bool {
        self.status == RetrievalStatus::Exhausted
    }
}

/// Loads the query template and exports the configured category.
///
/// # Errors
///
/// Returns an error if the query template cannot be read, the output file
/// cannot be written, or retrieval fails fatally.
pub(crate) async fn run_export(config: &ExportConfig) -> anyhow::Result<ExportSummary> {
    let query = metrocat_core::load_query_template(&config.query_path)?;
    export_category(config, query).await
}

/// Pages through the category and writes every batch to
/// [`ExportConfig::output_path`].
///
/// # Errors
///
/// Returns an error if the client cannot be built, the output file cannot be
/// created or written, or the retriever reports a fatal error. Retry
/// exhaustion is not an error here; it shows up as
/// [`RetrievalStatus::Aborted`] in the summary.
pub(crate) async fn export_category(
    config: &ExportConfig,
    query: String,
) -> anyhow::Result<ExportSummary> {
    let client = CatalogClient::from_config(config).context("failed to build catalog client")?;
    let request = CatalogRequest::first_page(config, query);
    let mut pages = CatalogPages::from_config(client, request, config);

    let path = config.output_path();
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = TsvWriter::new(BufWriter::new(file));
    writer.write_header()?;
    writer.flush()?;

    tracing::info!(
        category = %config.category,
        store_id = config.store_id,
        page_size = config.page_size,
        path = %path.display(),
        "starting catalog export"
    );

    let mut records = 0usize;
    while let Some(batch) = pages.next_batch().await.with_context(|| {
        format!(
            "catalog retrieval failed after {records} records; {} holds a partial export",
            path.display()
        )
    })? {
        writer
            .write_records(&batch)
            .and_then(|()| writer.flush())
            .with_context(|| format!("failed to write {}", path.display()))?;
        records += batch.len();
    }

    debug_assert_eq!(writer.rows_written(), records + 1);

    Ok(ExportSummary {
        path,
        pages: pages.pages_fetched(),
        records,
        status: pages.status(),
    })
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
