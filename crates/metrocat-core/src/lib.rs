pub mod app_config;
pub mod config;
pub mod records;

pub use app_config::ExportConfig;
pub use config::{load_export_config, load_export_config_from_env, load_query_template};
pub use records::{NormalizedRecord, TSV_HEADERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read query template {path}: {source}")]
    QueryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("query template {path} is empty")]
    EmptyQuery { path: String },
}
