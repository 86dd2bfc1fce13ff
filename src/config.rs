// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Client configuration.
//!
//! Configuration resolves from three sources with increasing precedence:
//! built-in defaults, an optional config file (`~/.nosh/config.json` or a
//! JSON/YAML file passed explicitly), and `NOSH_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default API base address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default image-gateway base address (pre-signed upload URLs).
pub const DEFAULT_GATEWAY_BASE_URL: &str = "http://localhost:3001";

/// Default chat WebSocket base address.
pub const DEFAULT_WS_BASE_URL: &str = "ws://localhost:3000";

/// Per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Whole-resource timeout in seconds.
pub const DEFAULT_RESOURCE_TIMEOUT_SECS: u64 = 300;

/// Interval between background user-data refreshes, in seconds. Also the
/// window within which repeated refresh calls coalesce into a no-op.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Default capacity of the session event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 16;

/// Global config directory name under the home directory.
pub const CONFIG_DIR: &str = ".nosh";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Resolved client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Backend API base address, e.g. `https://api.example.com/api`.
    pub base_url: String,
    /// Image-gateway base address for pre-signed upload URLs.
    pub gateway_base_url: String,
    /// Chat WebSocket base address.
    pub ws_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Whole-resource timeout in seconds.
    pub resource_timeout_secs: u64,
    /// Background refresh interval / refresh coalescing window in seconds.
    pub refresh_interval_secs: u64,
    /// Capacity of the session state-change event channel.
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            gateway_base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
            ws_base_url: DEFAULT_WS_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            resource_timeout_secs: DEFAULT_RESOURCE_TIMEOUT_SECS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ClientConfig {
    /// Apply `NOSH_*` environment-variable overrides to this config.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("NOSH_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(url) = std::env::var("NOSH_GATEWAY_BASE_URL") {
            self.gateway_base_url = url;
        }
        if let Ok(url) = std::env::var("NOSH_WS_BASE_URL") {
            self.ws_base_url = url;
        }
        if let Ok(secs) = std::env::var("NOSH_REFRESH_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse() {
                self.refresh_interval_secs = secs;
            }
        }
        self
    }
}

/// Get the global config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

/// Get the global config file path.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Load a configuration file (JSON or YAML, chosen by extension).
pub fn load_config_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

/// Load the effective configuration: defaults, then the global config file
/// if present, then environment overrides.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let config = match config_path() {
        Some(path) if path.exists() => load_config_file(&path)?,
        _ => ClientConfig::default(),
    };
    Ok(config.apply_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.resource_timeout_secs, 300);
        assert_eq!(config.refresh_interval_secs, 300);
    }

    #[test]
    fn test_load_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"baseUrl": "https://api.example.com/api"}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.base_url, "https://api.example.com/api");
        // Unspecified fields keep their defaults.
        assert_eq!(config.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
    }

    #[test]
    fn test_load_yaml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "baseUrl: https://api.example.com/api\nrefreshIntervalSecs: 60\n")
            .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.base_url, "https://api.example.com/api");
        assert_eq!(config.refresh_interval_secs, 60);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.json");
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_env_override() {
        // Only this test touches NOSH_BASE_URL.
        std::env::set_var("NOSH_BASE_URL", "https://staging.example.com/api");
        let config = ClientConfig::default().apply_env();
        std::env::remove_var("NOSH_BASE_URL");
        assert_eq!(config.base_url, "https://staging.example.com/api");
    }
}
