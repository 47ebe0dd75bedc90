//! Input validation for hostnames, upstream targets, and port lists.
//!
//! Pure functions run before any round trip, so obviously malformed input
//! is rejected without touching the remote store.

use url::Url;

/// Whether `value` looks like a DNS hostname usable in a host matcher.
pub fn host(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 253
        && value.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Whether `value` parses as a TCP port number.
pub fn port(value: &str) -> bool {
    value.parse::<u16>().is_ok_and(|p| p > 0)
}

/// Whether `value` is a dialable upstream target: `host:port` (hostname or
/// IP) or a full URL.
pub fn dial_target(value: &str) -> bool {
    if let Some((head, tail)) = value.rsplit_once(':') {
        if port(tail) && (host(head) || head.parse::<std::net::IpAddr>().is_ok()) {
            return true;
        }
    }
    Url::parse(value).is_ok_and(|url| url.has_host())
}

/// Parse a comma-separated port list, trimming whitespace around entries.
/// Returns the first entry that is not a valid port number.
pub fn ports(list: &str) -> Result<Vec<String>, String> {
    let mut out = Vec::new();
    for entry in list.split(',') {
        let entry = entry.trim();
        if !port(entry) {
            return Err(entry.to_owned());
        }
        out.push(entry.to_owned());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host() {
        assert!(host("api.example.com"));
        assert!(host("localhost"));
        assert!(!host("invalid host"));
        assert!(!host(""));
        assert!(!host("-bad.example.com"));
        assert!(!host("trailing.dot."));
    }

    #[test]
    fn test_dial_target() {
        assert!(dial_target("localhost:8080"));
        assert!(dial_target("127.0.0.1:3000"));
        assert!(dial_target("http://localhost:8080"));
        assert!(!dial_target("invalid"));
        assert!(!dial_target(""));
        assert!(!dial_target("localhost:notaport"));
    }

    #[test]
    fn test_ports_list() {
        assert_eq!(
            ports("8080, 8081,9000"),
            Ok(vec!["8080".to_owned(), "8081".to_owned(), "9000".to_owned()])
        );
        assert_eq!(ports("8080,80x0"), Err("80x0".to_owned()));
        assert_eq!(ports(""), Err(String::new()));
        assert_eq!(ports("0"), Err("0".to_owned()));
    }
}
