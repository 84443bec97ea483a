//! FILENAME: core/engine/src/config.rs
//! PURPOSE: Dashboard configuration shared by every crate in the workspace.
//! CONTEXT: Loaded from JSON; every field has a default so a partial file
//! (or none at all) yields a working configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Tunables for one dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Rows per table page.
    pub page_size: usize,

    /// Hard limit for a load/refresh round trip.
    pub request_timeout_secs: u64,

    /// `limit` used for each batched request when loading a full feed.
    pub fetch_batch_size: usize,

    /// How long a loaded snapshot may be served from the in-memory cache.
    pub cache_ttl_secs: u64,

    /// Columns whose edit requires the elevated capability.
    pub sensitive_columns: Vec<String>,

    /// Worksheet name used on export.
    pub export_sheet_name: String,

    /// Whether the table honours the date-range filter.
    pub date_range_filter: bool,

    /// Restrict daily charts to the latest observed month.
    pub latest_month_only: bool,

    /// Show only the latest observed month's rows in the table. Trends still
    /// cover every loaded row.
    pub latest_month_table: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            page_size: 100,
            request_timeout_secs: 15,
            fetch_batch_size: 1000,
            cache_ttl_secs: 300,
            sensitive_columns: vec!["Link to Intimation".to_string(), "PDF Link".to_string()],
            export_sheet_name: "Data".to_string(),
            date_range_filter: false,
            latest_month_only: true,
            latest_month_table: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("pageSize must be at least 1".to_string()));
        }
        if self.fetch_batch_size == 0 {
            return Err(ConfigError::Invalid("fetchBatchSize must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("requestTimeoutSecs must be at least 1".to_string()));
        }
        if self.export_sheet_name.trim().is_empty() {
            return Err(ConfigError::Invalid("exportSheetName must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
