//! Client configuration loaded from `config.toml`.
//!
//! All fields have defaults so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use std::path::PathBuf;

/// Global client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the interview service.
    pub base_url: String,
    /// Per-request timeout. Reply generation can take a while.
    pub request_timeout_secs: u64,
    /// Environment variable consulted for a non-interactive login.
    pub credential_env: String,
    /// Where exported feedback files are written. Defaults to the current directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 60,
            credential_env: "OPENROUTER_API_KEY".to_string(),
            export_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(r#"base_url = "https://interview.example.com""#).unwrap();
        assert_eq!(config.base_url, "https://interview.example.com");
        assert_eq!(config.credential_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
