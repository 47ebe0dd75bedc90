//! Path codec for the configuration tree.
//!
//! Paths address nested locations with a filesystem-like syntax
//! (`/apps/http/servers/srv0/routes`). The codec converts between the
//! string form and the key sequence the accessor walks. The root is `"/"`
//! as a string and the empty key sequence.

/// Split a path into its key sequence.
///
/// Empty segments produced by leading, trailing, or doubled slashes are
/// discarded; the root (`""` or `"/"`) yields an empty sequence.
pub fn split(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join a key sequence back into a canonical path.
///
/// Zero keys yields the root path `"/"`; the result never contains doubled
/// slashes or a trailing slash.
pub fn join<S: AsRef<str>>(keys: &[S]) -> String {
    if keys.is_empty() {
        return "/".to_owned();
    }
    let mut out = String::new();
    for key in keys {
        out.push('/');
        out.push_str(key.as_ref());
    }
    out
}

/// Normalize a path string to canonical form: a single leading slash, no
/// trailing slash, no repeated slashes. `""` and `"/"` both normalize to
/// the root `"/"`.
pub fn normalize(path: &str) -> String {
    join(&split(path))
}
