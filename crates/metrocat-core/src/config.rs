use std::path::Path;

use crate::app_config::ExportConfig;
use crate::ConfigError;

/// Load export configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_export_config() -> Result<ExportConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_export_config_from_env()
}

/// Load export configuration from environment variables already in the process.
///
/// Unlike [`load_export_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_export_config_from_env() -> Result<ExportConfig, ConfigError> {
    build_export_config(|key| std::env::var(key))
}

/// Build export configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are rejected.
fn build_export_config<F>(lookup: F) -> Result<ExportConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_url = or_default(
        "METROCAT_API_URL",
        "https://api.metro-cc.ru/products-api/graph",
    );
    let base_url = or_default("METROCAT_BASE_URL", "https://online.metro-cc.ru");
    let store_id = parse_u32("METROCAT_STORE_ID", "10")?;

    let category = or_default("METROCAT_CATEGORY", "chay");
    if category.trim().is_empty() {
        return Err(invalid("METROCAT_CATEGORY", "must not be empty".to_string()));
    }

    let page_size = parse_u32("METROCAT_PAGE_SIZE", "30")?;
    if page_size == 0 {
        return Err(invalid(
            "METROCAT_PAGE_SIZE",
            "must be greater than zero".to_string(),
        ));
    }

    let query_path = PathBuf::from(or_default("METROCAT_QUERY_PATH", "./query.txt"));
    let output_dir = PathBuf::from(or_default("METROCAT_OUTPUT_DIR", "."));
    let log_level = or_default("METROCAT_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("METROCAT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("METROCAT_USER_AGENT", "metrocat/0.1 (catalog-export)");
    let max_retries = parse_u32("METROCAT_MAX_RETRIES", "5")?;
    let retry_backoff_base_ms = parse_u64("METROCAT_RETRY_BACKOFF_BASE_MS", "100")?;
    let inter_request_delay_ms = parse_u64("METROCAT_INTER_REQUEST_DELAY_MS", "0")?;

    let max_pages = parse_usize("METROCAT_MAX_PAGES", "1000")?;
    if max_pages == 0 {
        return Err(invalid(
            "METROCAT_MAX_PAGES",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(ExportConfig {
        api_url,
        base_url,
        store_id,
        category,
        page_size,
        query_path,
        output_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        inter_request_delay_ms,
        max_pages,
    })
}

/// Read the GraphQL query template sent with every page request.
///
/// # Errors
///
/// Returns [`ConfigError::QueryFileIo`] if the file cannot be read and
/// [`ConfigError::EmptyQuery`] if it holds only whitespace.
pub fn load_query_template(path: &Path) -> Result<String, ConfigError> {
    let query = std::fs::read_to_string(path).map_err(|e| ConfigError::QueryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    if query.trim().is_empty() {
        return Err(ConfigError::EmptyQuery {
            path: path.display().to_string(),
        });
    }

    Ok(query)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
