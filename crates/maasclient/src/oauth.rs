//! OAuth 1.0 request signing for MAAS
//!
//! MAAS accepts the PLAINTEXT signature method, so signing is just the
//! percent-encoded consumer and token secrets joined by `&`.

use crate::credentials::Credentials;
use rand::distributions::Alphanumeric;
use rand::Rng;

const NONCE_LEN: usize = 32;

/// RFC 3986 percent-encoding (unreserved characters pass through)
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// PLAINTEXT signature: `enc(consumer_secret)&enc(token_secret)`
pub fn plaintext_signature(consumer_secret: &str, token_secret: &str) -> String {
    format!("{}&{}", encode(consumer_secret), encode(token_secret))
}

/// Build the `Authorization` header value for one request
pub fn authorization_header(
    creds: &Credentials,
    consumer_secret: &str,
    nonce: &str,
    timestamp: i64,
) -> String {
    let signature = plaintext_signature(consumer_secret, creds.token_secret());
    let timestamp = timestamp.to_string();

    let params = [
        ("oauth_version", "1.0"),
        ("oauth_signature_method", "PLAINTEXT"),
        ("oauth_consumer_key", creds.consumer_key()),
        ("oauth_token", creds.token_key()),
        ("oauth_signature", signature.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_timestamp", timestamp.as_str()),
    ];

    let fields: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
        .collect();

    format!("OAuth realm=\"\", {}", fields.join(", "))
}

/// Fresh alphanumeric nonce
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Sign with a new nonce and the current time
pub fn sign(creds: &Credentials, consumer_secret: &str) -> String {
    authorization_header(
        creds,
        consumer_secret,
        &generate_nonce(),
        chrono::Utc::now().timestamp(),
    )
}
