//! Client configuration
//!
//! Config file: ~/.config/maasclient/config.toml or /etc/maasclient/config.toml

use crate::auth::{CredentialSource, DEFAULT_API_URL};
use crate::error::{MaasError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment override for the API endpoint
pub const ENV_API_URL: &str = "MAAS_API_URL";

/// Environment override for the API key
pub const ENV_API_KEY: &str = "MAAS_API_KEY";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_username() -> String {
    "root".to_string()
}

fn default_credentials_file() -> String {
    "~/.cloud-install/maas-creds".to_string()
}

fn default_api_key_command() -> Vec<String> {
    ["sudo", "maas-region-admin", "apikey", "--username", "{username}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    30
}

/// MAAS client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the MAAS 1.0 API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// MAAS user whose key is provisioned when no credentials file exists
    #[serde(default = "default_username")]
    pub username: String,

    /// Cached API key location, `~/` expands to the home directory
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// argv used to provision an API key; `{username}` is substituted
    #[serde(default = "default_api_key_command")]
    pub api_key_command: Vec<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key supplied directly (env or CLI), never read from the file
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: default_username(),
            credentials_file: default_credentials_file(),
            api_key_command: default_api_key_command(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ClientConfig {
    /// Get default user config path: ~/.config/maasclient/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("maasclient").join("config.toml"))
    }

    /// Get system config path: /etc/maasclient/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/maasclient/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. User config (~/.config/maasclient/config.toml)
    /// 2. System config (/etc/maasclient/config.toml)
    /// 3. Defaults
    ///
    /// Environment overrides are applied on top of whichever was found.
    pub fn load() -> Result<Self> {
        let mut config = match Self::user_config_path().filter(|p| p.exists()) {
            Some(user_path) => Self::load_from_path(&user_path)?,
            None => {
                let system_path = Self::system_config_path();
                if system_path.exists() {
                    Self::load_from_path(&system_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MaasError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
            .map_err(|e| MaasError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply MAAS_API_URL / MAAS_API_KEY when set
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
    }

    /// Credentials file with `~/` expanded
    pub fn credentials_path(&self) -> PathBuf {
        expand_home(&self.credentials_file)
    }

    /// Where `MaasAuth::get_api_key` looks for a key
    pub fn credential_source(&self) -> Result<CredentialSource> {
        if self.api_key_command.is_empty() {
            return Err(MaasError::Config("api_key_command must not be empty".to_string()));
        }
        Ok(CredentialSource {
            credentials_file: self.credentials_path(),
            api_key_command: self.api_key_command.clone(),
        })
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost/MAAS/api/1.0");
        assert_eq!(config.username, "root");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_key_command[0], "sudo");
        assert_eq!(config.api_key_command.last().unwrap(), "{username}");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml("api_url = \"http://maas.example/MAAS/api/1.0\"\n").unwrap();
        assert_eq!(config.api_url, "http://maas.example/MAAS/api/1.0");
        assert_eq!(config.username, "root");
        assert_eq!(config.credentials_file, "~/.cloud-install/maas-creds");
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "username = \"admin\"\ntimeout_secs = 5\napi_key_command = [\"maas-region\", \"apikey\", \"--username={username}\"]\n",
        )
        .unwrap();

        let config = ClientConfig::load_from_path(&path).unwrap();
        assert_eq!(config.username, "admin");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_key_command.len(), 3);
    }

    #[test]
    fn test_load_from_path_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();

        let err = ClientConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, MaasError::Config(_)));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/etc/maas-creds"), PathBuf::from("/etc/maas-creds"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.cloud-install/maas-creds"), home.join(".cloud-install/maas-creds"));
        }
    }

    #[test]
    fn test_empty_command_rejected() {
        let config = ClientConfig {
            api_key_command: Vec::new(),
            ..ClientConfig::default()
        };
        assert!(config.credential_source().is_err());
    }
}
