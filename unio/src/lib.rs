//! Unified resource handle runtime.
//!
//! Files, listening sockets and connected sockets share one integer handle
//! namespace. Callers hold plain [`Handle`] values and drive every resource
//! through the same eight operations on [`Runtime`].
//!
//! - **[`core`]**: Pure logic (handles, the handle table, address and open
//!   flag parsing, call modes). No I/O, fully testable in isolation.
//! - **[`io`]**: Resource drivers over the host platform (tokio files and TCP
//!   sockets) plus configuration loading.
//!
//! [`facade`] ties the two together: it classifies a handle through the table
//! and delegates to the matching driver.

pub mod core;
pub mod facade;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::handle::{Handle, Kind};
pub use crate::core::mode::CallMode;
pub use crate::core::open_flags::OpenFlag;
pub use crate::facade::Runtime;
pub use crate::io::config::RuntimeConfig;
