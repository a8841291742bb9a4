//! Deterministic, pure logic shared by the runtime.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod address;
pub mod handle;
pub mod mode;
pub mod open_flags;
pub mod table;
