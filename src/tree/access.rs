//! Nested reads, writes, and deletes on an in-memory tree.
//!
//! # Responsibilities
//! - Walk a `serde_json::Value` tree one key at a time
//! - Index mappings by key and sequences by parsed integer
//! - Create missing intermediate mappings on write
//!
//! # Design Decisions
//! - `get`/`has_path` treat any shape mismatch as not-found, never an error
//! - `set`/`delete` report shape mismatches as `TreeError` so callers can
//!   tell bad tree shape from a missing entry
//! - Sequences are never created or grown implicitly; an out-of-range
//!   index is an error

use serde_json::{Map, Value};

use crate::tree::errors::TreeError;
use crate::tree::path;

/// Read the node at `keys`, or `None` if the path does not resolve.
///
/// A mapping is indexed by key, a sequence by parsing the key as a
/// non-negative integer. Zero keys yields the root itself.
pub fn get<'a, S: AsRef<str>>(root: &'a Value, keys: &[S]) -> Option<&'a Value> {
    let mut node = root;
    for key in keys {
        let key = key.as_ref();
        node = match node {
            Value::Object(map) => map.get(key)?,
            Value::Array(seq) => seq.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Whether a node of any type (including null) exists at `keys`.
pub fn has_path<S: AsRef<str>>(root: &Value, keys: &[S]) -> bool {
    get(root, keys).is_some()
}

/// Write `value` at `keys`, creating empty mappings for missing
/// intermediate keys. Mutates the tree in place.
///
/// Existing sequences may be indexed (in range) but never grown; a scalar
/// in the middle of the path is an error. Zero keys replaces the root.
pub fn set<S: AsRef<str>>(root: &mut Value, value: Value, keys: &[S]) -> Result<(), TreeError> {
    let Some((last, parents)) = keys.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for (depth, key) in parents.iter().enumerate() {
        let key = key.as_ref();
        node = match node {
            Value::Object(map) => map
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(seq) => {
                let index = seq_index(seq.len(), key, &keys[..depth])?;
                &mut seq[index]
            }
            _ => {
                return Err(TreeError::NotAContainer {
                    at: path::join(&keys[..depth]),
                })
            }
        };
    }

    match node {
        Value::Object(map) => {
            map.insert(last.as_ref().to_owned(), value);
        }
        Value::Array(seq) => {
            let index = seq_index(seq.len(), last.as_ref(), parents)?;
            seq[index] = value;
        }
        _ => {
            return Err(TreeError::NotAContainer {
                at: path::join(parents),
            })
        }
    }
    Ok(())
}

/// Remove the node at `keys`.
///
/// Returns `Ok(false)` when a mapping key along the path is absent (nothing
/// to delete). Removing a sequence element shifts later elements down.
/// Scalars mid-path, non-integer sequence keys, and out-of-range indices
/// are errors, as is the empty key sequence.
pub fn delete<S: AsRef<str>>(root: &mut Value, keys: &[S]) -> Result<bool, TreeError> {
    let Some((last, parents)) = keys.split_last() else {
        return Err(TreeError::EmptyKeys);
    };

    let mut node = root;
    for (depth, key) in parents.iter().enumerate() {
        let key = key.as_ref();
        node = match node {
            Value::Object(map) => match map.get_mut(key) {
                Some(child) => child,
                None => return Ok(false),
            },
            Value::Array(seq) => {
                let index = seq_index(seq.len(), key, &keys[..depth])?;
                &mut seq[index]
            }
            _ => {
                return Err(TreeError::NotAContainer {
                    at: path::join(&keys[..depth]),
                })
            }
        };
    }

    match node {
        Value::Object(map) => Ok(map.remove(last.as_ref()).is_some()),
        Value::Array(seq) => {
            let index = seq_index(seq.len(), last.as_ref(), parents)?;
            seq.remove(index);
            Ok(true)
        }
        _ => Err(TreeError::NotAContainer {
            at: path::join(parents),
        }),
    }
}

fn seq_index<S: AsRef<str>>(len: usize, key: &str, prefix: &[S]) -> Result<usize, TreeError> {
    let index: usize = key.parse().map_err(|_| TreeError::BadIndex {
        at: path::join(prefix),
        key: key.to_owned(),
    })?;
    if index >= len {
        return Err(TreeError::IndexOutOfRange {
            at: path::join(prefix),
            index,
            len,
        });
    }
    Ok(index)
}
