//! HTTP transport for the MAAS API
//!
//! `MaasClient` builds requests and signs them; a `Transport` puts them on the
//! wire. `HttpTransport` is the real implementation, `FakeTransport` replays
//! canned responses for tests.

use crate::error::{MaasError, Result};
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// HTTP methods used by the MAAS 1.0 API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

/// One unsigned API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn form(mut self, key: &str, value: &str) -> Self {
        self.form.push((key.to_string(), value.to_string()));
        self
    }

    /// Look up a form field by name
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends signed requests
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest, authorization: &str) -> Result<ApiResponse>;
}

/// Real transport backed by a blocking reqwest client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("maasclient/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MaasError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest, authorization: &str) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    MaasError::Timeout(self.timeout_secs)
                } else {
                    MaasError::Http(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| MaasError::Http(format!("Failed to read response body: {}", e)))?;

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(ApiResponse { status, body })
    }
}

/// Request captured by `FakeTransport`
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: ApiRequest,
    pub authorization: String,
}

/// Fake transport for testing
///
/// Responses are matched by method and URL suffix; unmatched requests get 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<(Method, String, ApiResponse)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a 200 response for `method` on URLs ending in `path`
    pub fn with(self, method: Method, path: &str, body: &str) -> Self {
        self.with_response(method, path, ApiResponse::ok(body))
    }

    pub fn with_response(self, method: Method, path: &str, response: ApiResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((method, path.to_string(), response));
        self
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent with `method`
    pub fn call_count(&self, method: Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.request.method == method)
            .count()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest, authorization: &str) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            request: request.clone(),
            authorization: authorization.to_string(),
        });

        let routes = self.routes.lock().unwrap();
        let response = routes
            .iter()
            .find(|(method, path, _)| *method == request.method && request.url.ends_with(path.as_str()))
            .map(|(_, _, response)| response.clone())
            .unwrap_or(ApiResponse {
                status: 404,
                body: "Not Found".to_string(),
            });

        Ok(response)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: &ApiRequest, authorization: &str) -> Result<ApiResponse> {
        (**self).send(request, authorization)
    }
}
