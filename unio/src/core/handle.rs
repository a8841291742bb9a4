//! Handle values and resource kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier for one live resource.
///
/// Valid handles are non-negative. [`Handle::INVALID`] (`-1`) is the sentinel
/// returned by `listen`, `accept` and `connect` when no resource was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(i64);

impl Handle {
    pub const INVALID: Handle = Handle(-1);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<Handle> for i64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resource kind a handle resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    File,
    Listener,
    Connection,
    /// Never allocated, or already closed.
    Unknown,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Kind::File => "file",
            Kind::Listener => "listener",
            Kind::Connection => "connection",
            Kind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sentinel_is_minus_one() {
        assert_eq!(Handle::INVALID.raw(), -1);
        assert!(!Handle::INVALID.is_valid());
        assert!(Handle::from_raw(0).is_valid());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&Handle::from_raw(7)).expect("serialize");
        assert_eq!(json, "7");
    }
}
