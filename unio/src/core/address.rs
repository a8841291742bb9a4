//! `"host:port"` address parsing.

use std::fmt;

/// A resolved `host:port` pair ready to hand to the socket layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Borrowed form accepted by `ToSocketAddrs` in both std and tokio.
    pub fn as_pair(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parse `"host:port"`.
///
/// - The split happens on the last `:`; a bracketed IPv6 host (`[::1]:80`)
///   loses its brackets.
/// - An empty host becomes `wildcard_host`.
/// - A missing, non-numeric or zero port makes the address malformed (`None`).
pub fn parse_address(address: &str, wildcard_host: &str) -> Option<Endpoint> {
    let (host, port) = address.rsplit_once(':')?;
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let port: u16 = port.parse().ok()?;
    if port == 0 {
        return None;
    }
    let host = host
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host);
    let host = if host.is_empty() { wildcard_host } else { host };
    Some(Endpoint {
        host: host.to_string(),
        port,
    })
}
