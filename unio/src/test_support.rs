//! Test-only helpers shared by unit and integration tests.

use crate::core::mode::CallMode;
use crate::facade::Runtime;

/// Ask the OS for a currently unused loopback port.
///
/// The probe socket is released before returning, so a later bind can still
/// race with other processes; good enough for tests.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("reserve loopback port")
}

/// `127.0.0.1:<port>` in the facade's address format.
pub fn loopback(port: u16) -> String {
    format!("127.0.0.1:{port}")
}

/// One runtime per call mode, so a test body can run against both.
pub fn runtimes() -> Vec<Runtime> {
    CallMode::ALL.into_iter().map(Runtime::with_mode).collect()
}

/// Deterministic payload of `len` bytes with a 251-byte period.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Temporary directory removed on drop.
pub fn scratch_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}
