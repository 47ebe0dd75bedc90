//! Path-addressed access to the configuration tree.
//!
//! # Data Flow
//! ```text
//! "/apps/http/servers/srv0/routes"
//!     → path.rs (split into key sequence)
//!     → access.rs (walk nested mappings/sequences)
//!     → node reference, or a shape error
//! ```
//!
//! # Design Decisions
//! - The tree is `serde_json::Value`: a tagged variant over mapping,
//!   sequence, and scalar, so traversal pattern-matches exhaustively.
//! - Absence is a query result (`Option` / `bool`), never an error.
//! - Writes create missing intermediate mappings on demand; sequences are
//!   never grown implicitly (they are created whole by the route layer).

pub mod access;
pub mod errors;
pub mod path;

pub use access::{delete, get, has_path, set};
pub use errors::TreeError;
