//! Client settings.
//!
//! Resolution order is flags, then environment, then defaults; the admin
//! endpoint default matches a stock local install.

use std::env;

/// Environment variable naming the admin endpoint URL.
pub const ADMIN_URL_ENV: &str = "CADDY_ADMIN_URL";

/// Environment variable holding the Cloudflare API token used by the ACME
/// DNS challenge.
pub const CF_TOKEN_ENV: &str = "CADDY_CF_TOKEN";

/// Default admin endpoint of a locally running server.
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:2019";

/// Default HTTP server name inside the configuration tree.
pub const DEFAULT_SERVER_NAME: &str = "srv0";

/// Connection settings for the configuration tree.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the admin endpoint.
    pub admin_url: String,

    /// Name of the HTTP server whose route list is managed.
    pub server_name: String,
}

impl Settings {
    pub fn new(admin_url: impl Into<String>, server_name: impl Into<String>) -> Self {
        Self {
            admin_url: admin_url.into(),
            server_name: server_name.into(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_url: env::var(ADMIN_URL_ENV).unwrap_or_else(|_| DEFAULT_ADMIN_URL.to_owned()),
            server_name: DEFAULT_SERVER_NAME.to_owned(),
        }
    }
}

/// Cloudflare API token from the environment, if set and non-empty.
pub fn cloudflare_token() -> Option<String> {
    env::var(CF_TOKEN_ENV).ok().filter(|token| !token.is_empty())
}
