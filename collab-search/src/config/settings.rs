//! Settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use collab_search_query::RESULTS_LIMIT;
use collab_search_repository::DEFAULT_INDEX_PATTERN;

use crate::AppError;

/// Default pause between bulk requests, in milliseconds.
const DEFAULT_BATCH_DELAY_MS: u64 = 1000;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Search backend URL. Unset runs every backend operation degraded.
    pub opensearch_url: Option<String>,
    pub index_prefix: String,
    pub index_pattern: String,
    pub max_results: usize,
    pub batch_delay: Duration,
    /// JSON snapshot loaded into the in-memory store.
    pub snapshot_path: Option<PathBuf>,
    pub authentication_enabled: bool,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: search backend URL (default: unset, degraded mode)
    /// - `SEARCH_INDEX_PREFIX`: prefix of every index name (default: empty)
    /// - `SEARCH_INDEX_PATTERN`: pattern between prefix and suffix (default: collab-data-)
    /// - `SEARCH_MAX_RESULTS`: results kept per group (default: 8)
    /// - `SEARCH_INGEST_BATCH_DELAY_MS`: pause between bulk requests (default: 1000)
    /// - `SEARCH_SNAPSHOT_PATH`: store snapshot file (default: unset, empty store)
    /// - `AUTHENTICATION_ENABLED`: enforce authorization policies (default: true)
    /// - `LOG_FORMAT`: `json` for JSON lines (default: pretty)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_results = match non_empty("SEARCH_MAX_RESULTS") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::config(format!("Invalid SEARCH_MAX_RESULTS '{}': {}", raw, e))
            })?,
            None => RESULTS_LIMIT,
        };

        let batch_delay_ms = match non_empty("SEARCH_INGEST_BATCH_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::config(format!("Invalid SEARCH_INGEST_BATCH_DELAY_MS '{}': {}", raw, e))
            })?,
            None => DEFAULT_BATCH_DELAY_MS,
        };

        let authentication_enabled = match non_empty("AUTHENTICATION_ENABLED") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|e| {
                AppError::config(format!("Invalid AUTHENTICATION_ENABLED '{}': {}", raw, e))
            })?,
            None => true,
        };

        let log_format = match non_empty("LOG_FORMAT").as_deref().map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            opensearch_url: non_empty("OPENSEARCH_URL"),
            index_prefix: lookup("SEARCH_INDEX_PREFIX").unwrap_or_default(),
            index_pattern: non_empty("SEARCH_INDEX_PATTERN")
                .unwrap_or_else(|| DEFAULT_INDEX_PATTERN.to_string()),
            max_results,
            batch_delay: Duration::from_millis(batch_delay_ms),
            snapshot_path: non_empty("SEARCH_SNAPSHOT_PATH").map(PathBuf::from),
            authentication_enabled,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.opensearch_url, None);
        assert_eq!(settings.index_prefix, "");
        assert_eq!(settings.index_pattern, DEFAULT_INDEX_PATTERN);
        assert_eq!(settings.max_results, 8);
        assert_eq!(settings.batch_delay, Duration::from_secs(1));
        assert!(settings.authentication_enabled);
        assert_eq!(settings.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("OPENSEARCH_URL", "http://search:9200"),
            ("SEARCH_INDEX_PREFIX", "staging-"),
            ("SEARCH_MAX_RESULTS", "20"),
            ("SEARCH_INGEST_BATCH_DELAY_MS", "0"),
            ("AUTHENTICATION_ENABLED", "false"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(settings.opensearch_url.as_deref(), Some("http://search:9200"));
        assert_eq!(settings.index_prefix, "staging-");
        assert_eq!(settings.max_results, 20);
        assert_eq!(settings.batch_delay, Duration::ZERO);
        assert!(!settings.authentication_enabled);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_url_means_degraded() {
        let settings = settings(&[("OPENSEARCH_URL", "  ")]).unwrap();
        assert!(settings.opensearch_url.is_none());
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = settings(&[("SEARCH_MAX_RESULTS", "many")]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
