//! Interface manifest extraction.
//!
//! Structured line comments in the runtime's declaration sources describe
//! each facade operation (name, parameters, return type, whether it
//! suspends). This crate turns those comments into the manifest an external
//! generator consumes to keep other target runtimes signature-compatible.
//!
//! - [`extract`]: the hand-off stream. Strips the marker from directive lines
//!   and nothing else; it knows no directive grammar.
//! - [`directive`]: parses the directive grammar used by the runtime.
//! - [`signature`]: pairs function declarations with their `_async` flags.
//!
//! Nothing here depends on the runtime crate; the declaration sources are
//! read as plain text.

pub mod directive;
pub mod extract;
pub mod logging;
pub mod signature;

/// Declaration sources of the `unio` runtime, in manifest order.
pub const BUNDLED_SOURCES: [(&str, &str); 2] = [
    (
        "unio/src/core/open_flags.rs",
        include_str!("../../unio/src/core/open_flags.rs"),
    ),
    ("unio/src/facade.rs", include_str!("../../unio/src/facade.rs")),
];
