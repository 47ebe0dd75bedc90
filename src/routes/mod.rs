//! Route synthesis and route-list operations.
//!
//! # Data Flow
//! ```text
//! intent (host, upstream target, domain, ports)
//!     → build.rs (synthesize route object + derive its identifier)
//!     → list.rs (find / replace-in-place / remove within the server's
//!                ordered route sequence)
//!     → written back as one subtree by the facade
//! ```
//!
//! # Design Decisions
//! - Identifier derivation is pure and lives only in build.rs, so the
//!   naming conventions can change in one place
//! - Ordering decides host-matching precedence, so an existing identifier
//!   is replaced at its current position, never delete-then-append

pub mod build;
pub mod list;

pub use build::{
    proxy_id, reverse_proxy_route, sub_proxy_id, sub_reverse_proxy_route, wildcard_id,
    wildcard_route, wildcard_subject, RouteError, ID_FIELD,
};
pub use list::{find_route_index, remove_route, route_id, upsert_route, Upsert};
