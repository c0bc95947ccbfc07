//! MAAS authentication
//!
//! Holds the API endpoint and the OAuth1 credentials used to sign requests.
//! Credentials come from the cached credentials file when it exists, otherwise
//! from a privileged provisioning command (`maas-region-admin apikey`).

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{MaasError, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Default MAAS 1.0 API endpoint on the region controller
pub const DEFAULT_API_URL: &str = "http://localhost/MAAS/api/1.0";

/// Where API keys are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSource {
    /// Cached key, read when present
    pub credentials_file: PathBuf,
    /// argv run when the file is missing; `{username}` is substituted
    pub api_key_command: Vec<String>,
}

impl Default for CredentialSource {
    fn default() -> Self {
        let config = ClientConfig::default();
        Self {
            credentials_file: config.credentials_path(),
            api_key_command: config.api_key_command,
        }
    }
}

impl CredentialSource {
    fn command_for(&self, username: &str) -> Vec<String> {
        self.api_key_command
            .iter()
            .map(|arg| arg.replace("{username}", username))
            .collect()
    }
}

/// MAAS authorization state
#[derive(Debug, Clone)]
pub struct MaasAuth {
    pub api_url: String,
    pub consumer_secret: String,
    credentials: Option<Credentials>,
    source: CredentialSource,
}

impl Default for MaasAuth {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            consumer_secret: String::new(),
            credentials: None,
            source: CredentialSource::default(),
        }
    }
}

impl MaasAuth {
    /// Initialize with an optional endpoint and optional API key
    pub fn new(api_url: Option<String>, api_key: Option<&str>) -> Result<Self> {
        let credentials = api_key.map(Credentials::parse).transpose()?;
        Ok(Self {
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            credentials,
            ..Self::default()
        })
    }

    /// Build from loaded configuration; a configured API key logs in immediately
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut auth = Self::new(Some(config.api_url.clone()), config.api_key.as_deref())?;
        auth.source = config.credential_source()?;
        Ok(auth)
    }

    /// Replace where `get_api_key` looks for credentials
    pub fn with_source(mut self, source: CredentialSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Checks if we hold an API key
    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn consumer_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.consumer_key())
    }

    pub fn token_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token_key())
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token_secret())
    }

    /// Resolve the API key for `username`
    ///
    /// Reads the credentials file when it exists; otherwise runs the
    /// provisioning command and takes its stdout.
    pub fn get_api_key(&mut self, username: &str) -> Result<()> {
        let path = &self.source.credentials_file;

        let raw = if path.is_file() {
            debug!("Reading MAAS credentials from {}", path.display());
            std::fs::read_to_string(path).map_err(|source| MaasError::CredentialsFile {
                path: path.clone(),
                source,
            })?
        } else {
            debug!("Could not find credentials, attempting to login.");
            self.run_api_key_command(username)?
        };

        self.credentials = Some(Credentials::parse(raw.trim_end_matches('\n'))?);
        Ok(())
    }

    fn run_api_key_command(&self, username: &str) -> Result<String> {
        let argv = self.source.command_for(username);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| MaasError::ApiKeyCommand("empty command".to_string()))?;

        debug!("Provisioning API key via {}", argv.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| MaasError::ApiKeyCommand(format!("failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(MaasError::ApiKeyCommand(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| MaasError::ApiKeyCommand(format!("non-UTF-8 output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn source_in(dir: &std::path::Path, command: &[&str]) -> CredentialSource {
        CredentialSource {
            credentials_file: dir.join("maas-creds"),
            api_key_command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_not_logged_in_by_default() {
        let auth = MaasAuth::default();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.api_url, DEFAULT_API_URL);
        assert_eq!(auth.consumer_secret, "");
        assert!(auth.consumer_key().is_none());
        assert!(auth.token_key().is_none());
        assert!(auth.token_secret().is_none());
    }

    #[test]
    fn test_new_with_key() {
        let auth = MaasAuth::new(Some("http://maas/api/1.0".into()), Some("ck:tk:ts")).unwrap();
        assert!(auth.is_logged_in());
        assert_eq!(auth.api_url, "http://maas/api/1.0");
        assert_eq!(auth.consumer_key(), Some("ck"));
        assert_eq!(auth.token_key(), Some("tk"));
        assert_eq!(auth.token_secret(), Some("ts"));
    }

    #[test]
    fn test_new_rejects_bad_key() {
        assert!(MaasAuth::new(None, Some("not-a-key")).is_err());
    }

    #[test]
    fn test_get_api_key_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path(), &["false"]);
        fs::write(&source.credentials_file, "ck:tk:ts\n").unwrap();

        let mut auth = MaasAuth::default().with_source(source);
        auth.get_api_key("root").unwrap();

        assert!(auth.is_logged_in());
        assert_eq!(auth.token_secret(), Some("ts"));
    }

    #[test]
    fn test_get_api_key_from_command() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path(), &["printf", "ck:{username}:ts\n"]);

        let mut auth = MaasAuth::default().with_source(source);
        auth.get_api_key("admin").unwrap();

        assert_eq!(auth.consumer_key(), Some("ck"));
        assert_eq!(auth.token_key(), Some("admin"));
        assert_eq!(auth.token_secret(), Some("ts"));
    }

    #[test]
    fn test_get_api_key_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path(), &["false"]);

        let mut auth = MaasAuth::default().with_source(source);
        let err = auth.get_api_key("root").unwrap_err();

        assert!(matches!(err, MaasError::ApiKeyCommand(_)));
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_get_api_key_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path(), &["false"]);
        fs::write(&source.credentials_file, "only:two\n").unwrap();

        let mut auth = MaasAuth::default().with_source(source);
        assert!(matches!(
            auth.get_api_key("root"),
            Err(MaasError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_from_config_uses_configured_key() {
        let config = ClientConfig {
            api_url: "http://10.0.0.2/MAAS/api/1.0".to_string(),
            api_key: Some("a:b:c".to_string()),
            ..ClientConfig::default()
        };
        let auth = MaasAuth::from_config(&config).unwrap();
        assert!(auth.is_logged_in());
        assert_eq!(auth.api_url, "http://10.0.0.2/MAAS/api/1.0");
        assert_eq!(auth.source().api_key_command, config.api_key_command);
    }
}
