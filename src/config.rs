//! Optional JSON configuration file.
//!
//! Stored as a plain JSON object on disk, every key optional:
//! ```json
//! {
//!   "data": "support_uke_24.xlsx",
//!   "sheet": "Ark1",
//!   "skip_header": true,
//!   "on_malformed": "skip_row",
//!   "time_format": "lettered",
//!   "chart_width": 60
//! }
//! ```
//! Command-line flags override anything set here.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::loader::MalformedCellPolicy;
use crate::time_of_day::TimeFormat;

/// File looked up next to the executable when no input path is given.
pub const DEFAULT_DATA_FILE: &str = "support_uke_24.xlsx";

pub const DEFAULT_CHART_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data: Option<PathBuf>,
    pub sheet: Option<String>,
    pub skip_header: Option<bool>,
    pub on_malformed: Option<MalformedCellPolicy>,
    pub time_format: Option<TimeFormat>,
    pub chart_width: Option<usize>,
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DashboardError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| DashboardError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Input path: the configured one, else [`DEFAULT_DATA_FILE`] beside `exe`.
    pub fn data_path(&self, exe: Option<&Path>) -> PathBuf {
        if let Some(data) = &self.data {
            return data.clone();
        }
        exe.and_then(Path::parent)
            .map(|dir| dir.join(DEFAULT_DATA_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    pub fn chart_width(&self) -> usize {
        self.chart_width.unwrap_or(DEFAULT_CHART_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(
            &path,
            r#"{"data": "week24.csv", "sheet": "Ark1", "skip_header": false,
                "on_malformed": "skip_row", "time_format": "lettered", "chart_width": 60}"#,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();

        assert_eq!(config.data, Some(PathBuf::from("week24.csv")));
        assert_eq!(config.sheet.as_deref(), Some("Ark1"));
        assert_eq!(config.skip_header, Some(false));
        assert_eq!(config.on_malformed, Some(MalformedCellPolicy::SkipRow));
        assert_eq!(config.time_format, Some(TimeFormat::lettered()));
        assert_eq!(config.chart_width(), 60);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "{}").unwrap();

        let config = DashboardConfig::load(&path).unwrap();

        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.chart_width(), DEFAULT_CHART_WIDTH);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"time_format": "%Q"}"#).unwrap();

        assert!(matches!(
            DashboardConfig::load(&path),
            Err(DashboardError::Config { .. })
        ));
        assert!(matches!(
            DashboardConfig::load(&dir.path().join("missing.json")),
            Err(DashboardError::Config { .. })
        ));
    }

    #[test]
    fn test_data_path_defaults_next_to_executable() {
        let config = DashboardConfig::default();
        assert_eq!(
            config.data_path(Some(Path::new("/opt/dashboard/support_dashboard"))),
            PathBuf::from("/opt/dashboard/support_uke_24.xlsx")
        );
        assert_eq!(config.data_path(None), PathBuf::from(DEFAULT_DATA_FILE));

        let config = DashboardConfig {
            data: Some(PathBuf::from("other.csv")),
            ..Default::default()
        };
        assert_eq!(config.data_path(None), PathBuf::from("other.csv"));
    }
}
