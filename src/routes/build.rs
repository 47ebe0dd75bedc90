//! Route object synthesis.
//!
//! Builds the JSON route objects the admin endpoint expects, one
//! constructor per intent: single-host reverse proxy, wildcard certificate
//! domain, and sub-domain proxy fanning out over several upstream ports.
//! Every route carries a derived identifier so it can be independently
//! looked up, replaced, and deleted later.

use serde_json::{json, Value};
use thiserror::Error;

/// Identifier field the admin endpoint uses to address objects in its
/// configuration tree.
pub const ID_FIELD: &str = "@id";

const WILDCARD_PREFIX: &str = "wildcard-";

/// Errors from route synthesis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A proxy route needs at least one upstream port to dial.
    #[error("route needs at least one upstream port")]
    NoUpstreams,
}

/// Identifier of a single-host reverse proxy route: the host itself.
pub fn proxy_id(from_host: &str) -> String {
    from_host.to_owned()
}

/// Identifier of a wildcard domain route.
pub fn wildcard_id(domain: &str) -> String {
    format!("{WILDCARD_PREFIX}{domain}")
}

/// Identifier of a sub-domain proxy route: the full host it matches.
pub fn sub_proxy_id(domain: &str, subdomain: &str) -> String {
    format!("{subdomain}.{domain}")
}

/// Certificate subject registered with the TLS automation policy for a
/// wildcard domain.
pub fn wildcard_subject(domain: &str) -> String {
    format!("*.{domain}")
}

/// Route matching exactly `from_host`, proxying to a single upstream.
pub fn reverse_proxy_route(from_host: &str, to_url: &str) -> Value {
    json!({
        "@id": proxy_id(from_host),
        "match": [{ "host": [from_host] }],
        "handle": [{
            "handler": "reverse_proxy",
            "upstreams": [{ "dial": to_url }],
        }],
        "terminal": true,
    })
}

/// Route matching `*.<domain>` with an empty subroute list.
///
/// On its own this only makes the hostname pattern routable; the wildcard
/// certificate additionally needs `wildcard_subject` registered with the
/// TLS automation policy, a separate subtree the facade writes.
pub fn wildcard_route(domain: &str) -> Value {
    json!({
        "@id": wildcard_id(domain),
        "match": [{ "host": [wildcard_subject(domain)] }],
        "handle": [{ "handler": "subroute", "routes": [] }],
        "terminal": true,
    })
}

/// Route matching `<subdomain>.<domain>`, load-balancing across one
/// upstream per entry in `ports`, each dialing `<host>:<port>`.
///
/// `ports` must be non-empty; an empty list is rejected rather than
/// producing a route with nothing to dial.
pub fn sub_reverse_proxy_route(
    domain: &str,
    subdomain: &str,
    ports: &[String],
    host: &str,
) -> Result<Value, RouteError> {
    if ports.is_empty() {
        return Err(RouteError::NoUpstreams);
    }
    let upstreams: Vec<Value> = ports
        .iter()
        .map(|port| json!({ "dial": format!("{host}:{port}") }))
        .collect();
    Ok(json!({
        "@id": sub_proxy_id(domain, subdomain),
        "match": [{ "host": [sub_proxy_id(domain, subdomain)] }],
        "handle": [{
            "handler": "reverse_proxy",
            "upstreams": upstreams,
        }],
        "terminal": true,
    }))
}
