//! maasclient - Rust bindings for the MAAS 1.0 REST API
//!
//! `MaasAuth` resolves the OAuth1 API key, `MaasClient` issues signed requests
//! and hands back the decoded JSON.

pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod transport;
pub mod types;

pub use auth::{CredentialSource, MaasAuth, DEFAULT_API_URL};
pub use client::{server_hostname, MaasClient};
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::{MaasError, Result};
pub use transport::{ApiRequest, ApiResponse, FakeTransport, HttpTransport, Method, Transport};
pub use types::{NodeStatus, FPI_TAG};
