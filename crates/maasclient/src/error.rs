//! Error types for the MAAS client

use std::path::PathBuf;

/// Errors returned by every MAAS client operation
#[derive(Debug, thiserror::Error)]
pub enum MaasError {
    #[error("Not logged in to the MAAS API (no API key loaded)")]
    NotLoggedIn,

    #[error("Invalid API key: {0}")]
    InvalidCredentials(String),

    #[error("Failed to read credentials file {}: {source}", .path.display())]
    CredentialsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API key command failed: {0}")]
    ApiKeyCommand(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("MAAS API returned HTTP {status} for {url}: {body}")]
    Api { status: u16, url: String, body: String },

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MaasError {
    /// True when the MAAS server could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, MaasError::Http(_) | MaasError::Timeout(_))
    }

    /// True when the server answered but the answer was unusable
    pub fn is_invalid_response(&self) -> bool {
        matches!(self, MaasError::Api { .. } | MaasError::InvalidJson(_))
    }
}

pub type Result<T> = std::result::Result<T, MaasError>;
