//! OAuth1 credentials in MAAS API key form
//!
//! A MAAS API key is `consumer_key:token_key:token_secret`.

use crate::error::{MaasError, Result};
use std::fmt;
use std::str::FromStr;

/// The three parts of a MAAS API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    token_key: String,
    token_secret: String,
}

impl Credentials {
    /// Parse an API key, tolerating surrounding whitespace and a trailing newline
    pub fn parse(api_key: &str) -> Result<Self> {
        let trimmed = api_key.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();

        if parts.len() != 3 {
            return Err(MaasError::InvalidCredentials(format!(
                "expected consumer_key:token_key:token_secret, got {} part(s)",
                parts.len()
            )));
        }

        if parts.iter().any(|p| p.is_empty()) {
            return Err(MaasError::InvalidCredentials(
                "API key contains an empty part".to_string(),
            ));
        }

        Ok(Self {
            consumer_key: parts[0].to_string(),
            token_key: parts[1].to_string(),
            token_secret: parts[2].to_string(),
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }

    /// Reassemble the colon-joined API key
    pub fn as_api_key(&self) -> String {
        format!("{}:{}:{}", self.consumer_key, self.token_key, self.token_secret)
    }
}

impl FromStr for Credentials {
    type Err = MaasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("token_key", &self.token_key)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let creds = Credentials::parse("ck:tk:ts\n").unwrap();
        assert_eq!(creds.consumer_key(), "ck");
        assert_eq!(creds.token_key(), "tk");
        assert_eq!(creds.token_secret(), "ts");
        assert_eq!(creds.as_api_key(), "ck:tk:ts");
    }

    #[test]
    fn test_parse_rejects_wrong_part_count() {
        assert!(Credentials::parse("ck:tk").is_err());
        assert!(Credentials::parse("ck:tk:ts:extra").is_err());
        assert!(Credentials::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_part() {
        let err = Credentials::parse("ck::ts").unwrap_err();
        assert!(matches!(err, MaasError::InvalidCredentials(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds: Credentials = "ck:tk:supersecret".parse().unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ck"));
        assert!(!debug.contains("supersecret"));
    }
}
