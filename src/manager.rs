//! High-level configuration operations.
//!
//! # Data Flow
//! ```text
//! intent (CLI or library call)
//!     → fetch the enclosing subtree        (client)
//!     → mutate it in memory                (tree + routes)
//!     → write the subtree back whole       (client)
//! ```
//!
//! # Design Decisions
//! - No tree state is cached between operations; every call re-fetches,
//!   so concurrent external writers see plain last-write-wins semantics
//! - Absence is a query result (bool / Option), never an error
//! - The wildcard operation writes two subtrees (route list, then TLS
//!   automation subjects); the writes are independent and a partial
//!   failure is not rolled back; re-running the operation converges

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::client::{AdminClient, AdminError};
use crate::routes::{self, RouteError};
use crate::settings::{self, Settings};
use crate::tree::{self, path, TreeError};
use crate::validate;

const HTTP_SERVERS_PATH: &str = "/apps/http/servers";
const AUTOMATION_PATH: &str = "/apps/tls/automation";
const POLICIES_PATH: &str = "/apps/tls/automation/policies";
const PKI_AUTHORITIES_PATH: &str = "/apps/pki/certificate_authorities";
const PKI_PATH: &str = "/apps/pki";

/// Errors from facade operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Route(#[from] RouteError),

    /// The operation needs a subtree that `setup` creates.
    #[error("no configuration at '{0}'; run setup first")]
    MissingConfig(String),

    /// Input rejected before any round trip.
    #[error("invalid {what}: '{value}'")]
    InvalidInput { what: &'static str, value: String },

    /// ACME setup needs a Cloudflare API token for the DNS challenge.
    #[error("cloudflare api token required for acme setup (pass --cf-token or set {})", settings::CF_TOKEN_ENV)]
    MissingToken,
}

/// Options for the initial bootstrap.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Cloudflare API token for the ACME DNS challenge; falls back to the
    /// environment. Required unless `local`.
    pub cf_token: Option<String>,

    /// Use the internal issuer instead of ACME (local development).
    pub local: bool,

    /// Install the local CA root into the system trust store.
    pub install_trust: Option<bool>,
}

/// Presence of the main configuration subtrees.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfigStatus {
    pub http_servers: bool,
    pub tls_automation: bool,
    pub pki: bool,
}

/// Facade over the remote configuration tree.
///
/// Holds connection settings only. Every operation fetches what it needs,
/// mutates in memory, and writes back; nothing survives across calls.
#[derive(Debug, Clone)]
pub struct CaddyManager {
    settings: Settings,
    client: AdminClient,
}

impl CaddyManager {
    pub fn new(settings: Settings) -> Self {
        let client = AdminClient::new(settings.admin_url.clone());
        Self { settings, client }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Bootstrap TLS automation, optional PKI trust installation, and the
    /// HTTP server. Idempotent: existing subtrees are left untouched.
    pub async fn setup(&self, opts: &SetupOptions) -> Result<(), Error> {
        self.setup_tls(opts).await?;
        if let Some(install) = opts.install_trust {
            self.setup_pki(install).await?;
        }
        self.setup_server().await?;
        info!(server = %self.settings.server_name, local = opts.local, "setup complete");
        Ok(())
    }

    async fn setup_tls(&self, opts: &SetupOptions) -> Result<(), Error> {
        if self.client.has_path(POLICIES_PATH).await? {
            debug!("tls automation already configured");
            return Ok(());
        }
        let issuer = if opts.local {
            json!({ "module": "internal" })
        } else {
            let token = opts
                .cf_token
                .clone()
                .or_else(settings::cloudflare_token)
                .ok_or(Error::MissingToken)?;
            json!({
                "module": "acme",
                "challenges": {
                    "dns": { "provider": { "name": "cloudflare", "api_token": token } },
                },
            })
        };
        self.ensure_path(AUTOMATION_PATH).await?;
        self.client
            .put_config(POLICIES_PATH, &json!([{ "issuers": [issuer] }]))
            .await?;
        Ok(())
    }

    async fn setup_pki(&self, install_trust: bool) -> Result<(), Error> {
        self.ensure_path(PKI_AUTHORITIES_PATH).await?;
        let local_ca = path::join(&["apps", "pki", "certificate_authorities", "local"]);
        self.client
            .put_config(&local_ca, &json!({ "install_trust": install_trust }))
            .await?;
        Ok(())
    }

    async fn setup_server(&self) -> Result<(), Error> {
        let server_path = self.server_path();
        if self.client.has_path(&server_path).await? {
            debug!(server = %self.settings.server_name, "http server already configured");
            return Ok(());
        }
        self.ensure_path(HTTP_SERVERS_PATH).await?;
        self.client
            .put_config(&server_path, &json!({ "listen": [":80", ":443"], "routes": [] }))
            .await?;
        Ok(())
    }

    /// Expose `from_host` on the upstream `to_url`. Re-adding an existing
    /// host replaces its route in place, keeping list order.
    pub async fn add_reverse_proxy(&self, from_host: &str, to_url: &str) -> Result<(), Error> {
        if !validate::host(from_host) {
            return Err(Error::InvalidInput { what: "host", value: from_host.to_owned() });
        }
        if !validate::dial_target(to_url) {
            return Err(Error::InvalidInput { what: "upstream target", value: to_url.to_owned() });
        }
        let mut route_list = self.fetch_routes().await?;
        let outcome = routes::upsert_route(&mut route_list, routes::reverse_proxy_route(from_host, to_url));
        self.write_routes(route_list).await?;
        info!(host = from_host, upstream = to_url, ?outcome, "reverse proxy route written");
        Ok(())
    }

    /// Enable `*.<domain>`: a wildcard route in the route list plus the
    /// certificate subject in the TLS automation policy. The two writes
    /// are not atomic together; on partial failure the route stays and
    /// re-running converges.
    pub async fn add_wildcard_route(&self, domain: &str) -> Result<(), Error> {
        if !validate::host(domain) {
            return Err(Error::InvalidInput { what: "domain", value: domain.to_owned() });
        }
        let mut route_list = self.fetch_routes().await?;
        routes::upsert_route(&mut route_list, routes::wildcard_route(domain));
        self.write_routes(route_list).await?;
        self.register_subject(&routes::wildcard_subject(domain)).await?;
        info!(domain, "wildcard route written");
        Ok(())
    }

    /// Expose `<subdomain>.<domain>` load-balanced across one upstream per
    /// port, each dialing `<host>:<port>`.
    pub async fn add_sub_reverse_proxy(
        &self,
        domain: &str,
        subdomain: &str,
        ports: &[String],
        host: &str,
    ) -> Result<(), Error> {
        if !validate::host(domain) {
            return Err(Error::InvalidInput { what: "domain", value: domain.to_owned() });
        }
        if !validate::host(subdomain) {
            return Err(Error::InvalidInput { what: "subdomain", value: subdomain.to_owned() });
        }
        if let Some(bad) = ports.iter().find(|p| !validate::port(p)) {
            return Err(Error::InvalidInput { what: "port", value: bad.clone() });
        }
        let route = routes::sub_reverse_proxy_route(domain, subdomain, ports, host)?;
        let mut route_list = self.fetch_routes().await?;
        routes::upsert_route(&mut route_list, route);
        self.write_routes(route_list).await?;
        info!(subdomain, domain, upstream_host = host, "sub-domain proxy route written");
        Ok(())
    }

    /// Remove the route with `id`. `Ok(false)` when no route carries it;
    /// the list is left untouched (length and order) in that case.
    pub async fn delete_route(&self, id: &str) -> Result<bool, Error> {
        let Some(mut route_list) = self.try_fetch_routes().await? else {
            return Ok(false);
        };
        if !routes::remove_route(&mut route_list, id) {
            debug!(id, "route not present");
            return Ok(false);
        }
        self.write_routes(route_list).await?;
        info!(id, "route deleted");
        Ok(true)
    }

    /// Whether a route with `id` exists in the server's route list.
    pub async fn has_id(&self, id: &str) -> Result<bool, Error> {
        let Some(route_list) = self.try_fetch_routes().await? else {
            return Ok(false);
        };
        Ok(routes::find_route_index(&route_list, id).is_some())
    }

    /// Whether anything is configured at `path`.
    pub async fn has_path(&self, path: &str) -> Result<bool, Error> {
        Ok(self.client.has_path(path).await?)
    }

    /// Read the subtree at `path`; `Ok(None)` when nothing is there.
    pub async fn get_config(&self, path: &str) -> Result<Option<Value>, Error> {
        Ok(self.client.get_config(path).await?)
    }

    /// Create every missing mapping along `target`, shallowest first.
    pub async fn ensure_path(&self, target: &str) -> Result<(), Error> {
        let keys = path::split(target);
        for depth in 1..=keys.len() {
            let prefix = path::join(&keys[..depth]);
            if !self.client.has_path(&prefix).await? {
                self.client.put_config(&prefix, &json!({})).await?;
            }
        }
        Ok(())
    }

    /// Presence of the main configuration subtrees.
    pub async fn status(&self) -> Result<ConfigStatus, Error> {
        Ok(ConfigStatus {
            http_servers: self.client.has_path(HTTP_SERVERS_PATH).await?,
            tls_automation: self.client.has_path(AUTOMATION_PATH).await?,
            pki: self.client.has_path(PKI_PATH).await?,
        })
    }

    fn server_path(&self) -> String {
        path::join(&["apps", "http", "servers", &self.settings.server_name])
    }

    fn routes_path(&self) -> String {
        path::join(&["apps", "http", "servers", &self.settings.server_name, "routes"])
    }

    async fn try_fetch_routes(&self) -> Result<Option<Vec<Value>>, Error> {
        let routes_path = self.routes_path();
        match self.client.get_config(&routes_path).await? {
            None => Ok(None),
            Some(Value::Array(route_list)) => Ok(Some(route_list)),
            Some(_) => Err(TreeError::NotASequence { at: routes_path }.into()),
        }
    }

    async fn fetch_routes(&self) -> Result<Vec<Value>, Error> {
        self.try_fetch_routes()
            .await?
            .ok_or_else(|| Error::MissingConfig(self.routes_path()))
    }

    async fn write_routes(&self, route_list: Vec<Value>) -> Result<(), Error> {
        self.client
            .put_config(&self.routes_path(), &Value::Array(route_list))
            .await?;
        Ok(())
    }

    /// Add `subject` to the first automation policy's subject list if it
    /// is not already present.
    async fn register_subject(&self, subject: &str) -> Result<(), Error> {
        let subjects_path = path::join(&["apps", "tls", "automation", "policies", "0", "subjects"]);
        let policies = self
            .client
            .get_config(POLICIES_PATH)
            .await?
            .ok_or_else(|| Error::MissingConfig(POLICIES_PATH.to_owned()))?;
        let mut subjects = match tree::get(&policies, &["0", "subjects"]) {
            None => Vec::new(),
            Some(Value::Array(list)) => list.clone(),
            Some(_) => return Err(TreeError::NotASequence { at: subjects_path }.into()),
        };
        if subjects.iter().any(|s| s.as_str() == Some(subject)) {
            debug!(subject, "certificate subject already registered");
            return Ok(());
        }
        subjects.push(Value::String(subject.to_owned()));
        self.client
            .put_config(&subjects_path, &Value::Array(subjects))
            .await?;
        Ok(())
    }
}
