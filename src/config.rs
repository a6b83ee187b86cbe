//! Application configuration
//!
//! Loaded from a JSON file (`~/.config/pawdesk/config.json` by default)
//! with environment-variable overrides. A completely absent config is not
//! an error: missing sheet credentials mean the remote fetch branch is
//! silently skipped and the tool runs against local data only.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::SheetsClient;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly named config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Remote spreadsheet configuration.
///
/// `sheet_id` and `api_key` gate the remote fetch path: when either is
/// empty the fetcher is never invoked. `access_token` is additionally
/// required for the row-update write path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetConfig {
    #[serde(default)]
    pub sheet_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// REST API server and relay configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the embedded API server binds to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static bearer token required on every API route
    #[serde(default)]
    pub api_token: String,
    /// Base URL the relay client posts submissions to
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
}

fn default_port() -> u16 {
    8787
}

fn default_backend_url() -> String {
    format!("http://127.0.0.1:{}", default_port())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            api_token: String::new(),
            backend_url: default_backend_url(),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// Search order:
    /// 1. Explicit path if provided (an error if it doesn't exist)
    /// 2. `$XDG_CONFIG_HOME/pawdesk/config.json`
    /// 3. Built-in defaults
    ///
    /// Environment variables override file values in all cases:
    /// `PAWDESK_SHEET_ID`, `PAWDESK_API_KEY`, `PAWDESK_ACCESS_TOKEN`,
    /// `PAWDESK_API_TOKEN`, `PAWDESK_BACKEND_URL`, `PAWDESK_PORT`.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit_path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                Self::load_from_path(p)?
            }
            None => match Self::default_config_path() {
                Some(p) if p.exists() => Self::load_from_path(&p)?,
                _ => Config::default(),
            },
        };

        config.apply_env();
        Ok(config)
    }

    fn default_config_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "pawdesk")?;
        Some(project_dirs.config_dir().join("config.json"))
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("PAWDESK_SHEET_ID") {
            self.sheet.sheet_id = v;
        }
        if let Ok(v) = std::env::var("PAWDESK_API_KEY") {
            self.sheet.api_key = v;
        }
        if let Ok(v) = std::env::var("PAWDESK_ACCESS_TOKEN") {
            self.sheet.access_token = Some(v);
        }
        if let Ok(v) = std::env::var("PAWDESK_API_TOKEN") {
            self.server.api_token = v;
        }
        if let Ok(v) = std::env::var("PAWDESK_BACKEND_URL") {
            self.server.backend_url = v;
        }
        if let Ok(v) = std::env::var("PAWDESK_PORT") {
            if let Ok(port) = v.parse() {
                self.server.port = port;
            }
        }
    }

    /// Whether the remote sheet is configured; absent credentials are a
    /// silent skip, never an error.
    pub fn has_sheet(&self) -> bool {
        !self.sheet.sheet_id.trim().is_empty() && !self.sheet.api_key.trim().is_empty()
    }

    /// Builds the sheets client, or `None` when not configured.
    pub fn sheets_client(&self) -> Option<SheetsClient> {
        if !self.has_sheet() {
            return None;
        }
        Some(SheetsClient::new(
            self.sheet.sheet_id.clone(),
            self.sheet.api_key.clone(),
            self.sheet.access_token.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_has_no_sheet() {
        let config = Config::default();
        assert!(!config.has_sheet());
        assert!(config.sheets_client().is_none());
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_load_explicit_missing_path_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.json")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_full_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "sheet": {
                    "sheet_id": "abc123",
                    "api_key": "key456",
                    "access_token": "tok789"
                },
                "server": {
                    "port": 9000,
                    "api_token": "secret",
                    "backend_url": "http://localhost:9000"
                }
            }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert!(config.has_sheet());
        assert_eq!(config.sheet.sheet_id, "abc123");
        assert_eq!(config.sheet.access_token.as_deref(), Some("tok789"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.api_token, "secret");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"sheet": {"sheet_id": "abc123"}}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();

        // API key missing: the sheet stays unconfigured (silent skip).
        assert!(!config.has_sheet());
        assert_eq!(config.server.port, 8787);
        assert!(config.server.backend_url.contains("8787"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json at all").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_blank_credentials_do_not_count_as_configured() {
        let config = Config {
            sheet: SheetConfig {
                sheet_id: "   ".to_string(),
                api_key: "key".to_string(),
                access_token: None,
            },
            ..Default::default()
        };
        assert!(!config.has_sheet());
    }
}
