//! Resource drivers and configuration.
//!
//! Each driver wraps one platform resource type. Drivers never touch the
//! handle table; the facade hands them the entry they operate on.

pub mod config;
pub mod connection;
pub mod file;
pub mod listener;
pub mod signal;
pub mod transfer;
