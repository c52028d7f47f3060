mod export;
mod tsv;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Exports one catalog category to a tab-separated file.
///
/// All settings come from `METROCAT_*` environment variables (or a `.env`
/// file); the output lands in `<METROCAT_OUTPUT_DIR>/<category>_results.tsv`.
#[derive(Debug, Parser)]
#[command(name = "metrocat")]
#[command(version, about = "Export a product catalog category to TSV")]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    let config = metrocat_core::load_export_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "loaded export configuration");

    let summary = export::run_export(&config).await?;

    tracing::info!(
        path = %summary.path.display(),
        pages = summary.pages,
        records = summary.records,
        status = %summary.status,
        "catalog export finished"
    );

    if !summary.is_complete() {
        anyhow::bail!(
            "catalog export incomplete ({}): {} holds {} records from {} pages",
            summary.status,
            summary.path.display(),
            summary.records,
            summary.pages
        );
    }

    Ok(())
}
