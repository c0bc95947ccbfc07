//! MAAS REST API client
//!
//! Each call is one OAuth1-signed request against the MAAS 1.0 API; JSON
//! bodies come back as `serde_json::Value` without further interpretation.

use crate::auth::MaasAuth;
use crate::config::ClientConfig;
use crate::error::{MaasError, Result};
use crate::oauth;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::types::{self, FPI_TAG};
use serde_json::Value;
use tracing::{debug, info};
use url::Host;

/// Client for the MAAS 1.0 REST API
pub struct MaasClient {
    auth: MaasAuth,
    transport: Box<dyn Transport>,
}

impl MaasClient {
    /// Client over HTTP using the configured endpoint and timeout
    ///
    /// A configured API key is used as-is; otherwise the key for
    /// `config.username` is resolved through `MaasAuth::get_api_key`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let mut auth = MaasAuth::from_config(config)?;
        if !auth.is_logged_in() {
            auth.get_api_key(&config.username)?;
        }
        Ok(Self::with_transport(auth, HttpTransport::new(config.timeout_secs)?))
    }

    pub fn with_transport(auth: MaasAuth, transport: impl Transport + 'static) -> Self {
        Self {
            auth,
            transport: Box::new(transport),
        }
    }

    pub fn auth(&self) -> &MaasAuth {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.auth.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Sign, send, and reject non-2xx responses
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let creds = self.auth.credentials().ok_or(MaasError::NotLoggedIn)?;
        let authorization = oauth::sign(creds, &self.auth.consumer_secret);

        let response = self.transport.send(&request, &authorization)?;

        if !response.is_success() {
            return Err(MaasError::Api {
                status: response.status,
                url: request.url,
                body: response.body,
            });
        }

        Ok(response)
    }

    /// Execute and decode the body; an empty body decodes to `null`
    fn request_json(&self, request: ApiRequest) -> Result<Value> {
        let response = self.execute(request)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|e| MaasError::InvalidJson(format!("Failed to parse response: {}", e)))
    }

    fn request_list(&self, request: ApiRequest) -> Result<Vec<Value>> {
        match self.request_json(request)? {
            Value::Array(items) => Ok(items),
            other => Err(MaasError::InvalidJson(format!(
                "expected a JSON array, got {}",
                other
            ))),
        }
    }

    fn get(&self, path: &str) -> ApiRequest {
        ApiRequest::new(Method::Get, self.url(path))
    }

    fn post(&self, path: &str) -> ApiRequest {
        ApiRequest::new(Method::Post, self.url(path))
    }

    fn delete(&self, path: &str) -> ApiRequest {
        ApiRequest::new(Method::Delete, self.url(path))
    }

    // Nodes

    /// All nodes known to MAAS
    pub fn nodes(&self) -> Result<Vec<Value>> {
        self.request_list(self.get("nodes/"))
    }

    pub fn node(&self, system_id: &str) -> Result<Value> {
        self.request_json(self.get(&node_path(system_id)))
    }

    /// Accept every declared node into MAAS
    pub fn nodes_accept_all(&self) -> Result<Value> {
        self.request_json(self.post("nodes/").form("op", "accept_all"))
    }

    pub fn node_commission(&self, system_id: &str) -> Result<Value> {
        self.node_op(system_id, "commission")
    }

    pub fn node_start(&self, system_id: &str) -> Result<Value> {
        self.node_op(system_id, "start")
    }

    pub fn node_stop(&self, system_id: &str) -> Result<Value> {
        self.node_op(system_id, "stop")
    }

    pub fn node_remove(&self, system_id: &str) -> Result<()> {
        self.execute(self.delete(&node_path(system_id)))?;
        info!("Removed node {}", system_id);
        Ok(())
    }

    fn node_op(&self, system_id: &str, op: &str) -> Result<Value> {
        self.request_json(self.post(&node_path(system_id)).form("op", op))
    }

    // Tags

    /// All tags defined in MAAS
    pub fn tags(&self) -> Result<Vec<Value>> {
        self.request_list(self.get("tags/"))
    }

    /// Create `name` unless a tag with that name already exists
    ///
    /// Returns `true` when a tag was created.
    pub fn tag_new(&self, name: &str) -> Result<bool> {
        let exists = self
            .tags()?
            .iter()
            .any(|tag| types::tag_name_of(tag) == Some(name));

        if exists {
            debug!("Tag {} already exists", name);
            return Ok(false);
        }

        self.execute(self.post("tags/").form("op", "new").form("name", name))?;
        info!("Created tag {}", name);
        Ok(true)
    }

    pub fn tag_delete(&self, name: &str) -> Result<()> {
        self.execute(self.delete(&tag_path(name)))?;
        info!("Deleted tag {}", name);
        Ok(())
    }

    /// Apply `tag` to the node `system_id`
    pub fn tag_machine(&self, tag: &str, system_id: &str) -> Result<()> {
        self.execute(
            self.post(&tag_path(tag))
                .form("op", "update_nodes")
                .form("add", system_id),
        )?;
        info!("Tagged {} with {}", system_id, tag);
        Ok(())
    }

    /// Tag every node with its own system id
    pub fn tag_name(&self, nodes: &[Value]) -> Result<()> {
        for node in nodes {
            let Some(system_id) = types::system_id(node) else {
                debug!("Skipping node without system_id");
                continue;
            };
            if types::has_tag(node, system_id) {
                continue;
            }
            self.tag_new(system_id)?;
            self.tag_machine(system_id, system_id)?;
        }
        Ok(())
    }

    /// Tag every node to use the fast path installer
    pub fn tag_fpi(&self, nodes: &[Value]) -> Result<()> {
        debug!("Creating tag: {}", FPI_TAG);
        self.tag_new(FPI_TAG)?;

        for node in nodes {
            let Some(system_id) = types::system_id(node) else {
                debug!("Skipping node without system_id");
                continue;
            };
            if !types::has_tag(node, FPI_TAG) {
                self.tag_machine(FPI_TAG, system_id)?;
            }
        }
        Ok(())
    }

    // Zones and users

    pub fn zones(&self) -> Result<Vec<Value>> {
        self.request_list(self.get("zones/"))
    }

    pub fn zone_new(&self, name: &str, description: &str) -> Result<Value> {
        self.request_json(
            self.post("zones/")
                .form("name", name)
                .form("description", description),
        )
    }

    pub fn users(&self) -> Result<Vec<Value>> {
        self.request_list(self.get("users/"))
    }

    // Server configuration

    /// Read one MAAS server configuration item, e.g. `maas_name`
    pub fn get_server_config(&self, name: &str) -> Result<Value> {
        self.request_json(
            self.get("maas/")
                .query("op", "get_config")
                .query("name", name),
        )
    }

    pub fn set_server_config(&self, name: &str, value: &str) -> Result<()> {
        self.execute(
            self.post("maas/")
                .form("op", "set_config")
                .form("name", name)
                .form("value", value),
        )?;
        info!("Set server config {}", name);
        Ok(())
    }

    /// Hostname of the MAAS server, taken from the API URL
    pub fn server_hostname(&self) -> Result<String> {
        server_hostname(&self.auth.api_url)
    }
}

/// Host component of a MAAS API URL; IPv6 addresses come back without brackets
pub fn server_hostname(api_url: &str) -> Result<String> {
    let url = url::Url::parse(api_url)
        .map_err(|e| MaasError::Config(format!("Invalid API URL {}: {}", api_url, e)))?;
    match url.host() {
        Some(Host::Domain(domain)) => Ok(domain.to_string()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        None => Err(MaasError::Config(format!("API URL has no host: {}", api_url))),
    }
}

fn node_path(system_id: &str) -> String {
    format!("nodes/{}/", urlencoding::encode(system_id))
}

fn tag_path(name: &str) -> String {
    format!("tags/{}/", urlencoding::encode(name))
}
