//! Call conventions: which facade operations suspend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The eight facade operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Open,
    Close,
    Read,
    Write,
    Unlink,
    Listen,
    Accept,
    Connect,
}

impl Op {
    pub const ALL: [Op; 8] = [
        Op::Open,
        Op::Close,
        Op::Read,
        Op::Write,
        Op::Unlink,
        Op::Listen,
        Op::Accept,
        Op::Connect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Op::Open => "open",
            Op::Close => "close",
            Op::Read => "read",
            Op::Write => "write",
            Op::Unlink => "unlink",
            Op::Listen => "listen",
            Op::Accept => "accept",
            Op::Connect => "connect",
        }
    }
}

/// Selects immediate completion vs suspend-on-call for the same contract.
///
/// Under `PreResolved`, `open`, `close`, `listen` and `unlink` finish with
/// blocking platform calls inside the first poll; only transfer and
/// connection-establishing operations suspend. Under `Deferred`, every
/// operation suspends on its platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallMode {
    #[default]
    PreResolved,
    Deferred,
}

impl CallMode {
    pub const ALL: [CallMode; 2] = [CallMode::PreResolved, CallMode::Deferred];

    pub fn suspends(self, op: Op) -> bool {
        match self {
            CallMode::Deferred => true,
            CallMode::PreResolved => {
                matches!(op, Op::Read | Op::Write | Op::Accept | Op::Connect)
            }
        }
    }
}

impl fmt::Display for CallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallMode::PreResolved => f.write_str("pre-resolved"),
            CallMode::Deferred => f.write_str("deferred"),
        }
    }
}

impl FromStr for CallMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-resolved" => Ok(CallMode::PreResolved),
            "deferred" => Ok(CallMode::Deferred),
            other => Err(format!(
                "unknown call mode '{other}' (expected pre-resolved or deferred)"
            )),
        }
    }
}
