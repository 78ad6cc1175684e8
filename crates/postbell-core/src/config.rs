use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const MIN_VISIBLE_WINDOW: usize = 1;

/// Feed configuration that can be loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedConfig {
    /// How many notifications the dropdown shows. Never less than one.
    pub visible_window: usize,

    /// `strftime` pattern for notification dates.
    pub date_format: String,

    /// Append logs to this file. Nothing is logged when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Default filter directive, overridden by `POSTBELL_LOG`.
    pub log_level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            visible_window: 5,
            date_format: "%-m/%-d/%Y".to_string(),
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl FeedConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: FeedConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.visible_window = self.visible_window.max(MIN_VISIBLE_WINDOW);
        self
    }

    /// `<config dir>/postbell/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("postbell").join("config.json"))
    }

    /// Load from `path` when given, else from the default location when a
    /// file exists there, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config_minimal() {
        let config: FeedConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.visible_window, 5);
    }

    #[test]
    fn test_parse_config_full() {
        let json = r#"{
            "visibleWindow": 8,
            "dateFormat": "%Y-%m-%d",
            "logFile": "/tmp/postbell.log",
            "logLevel": "debug"
        }"#;
        let config: FeedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.visible_window, 8);
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/postbell.log")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"visibleWindow": 3}}"#).unwrap();

        let config = FeedConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.visible_window, 3);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_zero_visible_window_is_raised_to_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"visibleWindow": 0}}"#).unwrap();

        let config = FeedConfig::load(file.path()).unwrap();
        assert_eq!(config.visible_window, 1);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = FeedConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
