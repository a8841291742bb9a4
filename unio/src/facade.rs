//! The unified I/O facade.
//!
//! [`Runtime`] is the context object that owns the handle table. Every
//! operation classifies its handle through the table, clones the entry out
//! and releases the table lock before any driver I/O, so the lock is never
//! held across a suspension point.
//!
//! Error policy (kept deliberately uneven):
//!
//! | operation | unknown handle | malformed address | platform failure |
//! |---|---|---|---|
//! | `open` | n/a | n/a | `Err` |
//! | `close` | no-op | n/a | `Err` for file flush, logged for sockets |
//! | `read` | empty | n/a | `Err` |
//! | `write` | no-op | n/a | `Err` |
//! | `unlink` | n/a | n/a | `Err` |
//! | `listen` | n/a | `-1` | `-1` |
//! | `accept` | `-1` | n/a | `-1` |
//! | `connect` | n/a | `-1` | `-1` |
//!
//! The `(def ...)` and `(defun ...)` line comments above each operation are
//! manifest directives read by `unio-manifest`; the `_async` flags describe
//! the default pre-resolved call mode. Plain `//` comments in this file are
//! reserved for directives.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use tracing::{debug, instrument, trace, warn};

use crate::core::address::{Endpoint, parse_address};
use crate::core::handle::{Handle, Kind};
use crate::core::mode::{CallMode, Op};
use crate::core::open_flags::{OpenFlag, OpenMode};
use crate::core::table::{HandleTable, Slot};
use crate::io::config::RuntimeConfig;
use crate::io::connection::ConnectionEntry;
use crate::io::file::FileEntry;
use crate::io::listener::ListenerEntry;

type Entry = Slot<Arc<FileEntry>, Arc<ListenerEntry>, Arc<ConnectionEntry>>;
type Table = HandleTable<Arc<FileEntry>, Arc<ListenerEntry>, Arc<ConnectionEntry>>;

/// One independent handle namespace and the resources bound into it.
///
/// Dropping the runtime releases every resource it still owns.
#[derive(Debug, Default)]
pub struct Runtime {
    config: RuntimeConfig,
    table: Mutex<Table>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            table: Mutex::new(Table::new()),
        }
    }

    pub fn with_mode(mode: CallMode) -> Self {
        Self::new(RuntimeConfig::with_mode(mode))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn mode(&self) -> CallMode {
        self.config.mode
    }

    pub fn classify(&self, handle: Handle) -> Kind {
        self.table().classify(handle)
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.table().len()
    }

    // (def open_async 0)
    // (defun (open: int) [(path: string) (opts: int[])])
    #[instrument(skip_all, fields(path = %path.as_ref().display(), mode = %self.config.mode))]
    pub async fn open(&self, path: impl AsRef<Path>, flags: Option<&[OpenFlag]>) -> Result<Handle> {
        let path = path.as_ref();
        let access = OpenMode::from_flags(flags);
        let entry =
            FileEntry::open(path, access, self.config.mode, self.config.buffer_size).await?;
        let handle = self.register(Slot::File(Arc::new(entry)));
        debug!(%handle, "file opened");
        Ok(handle)
    }

    // (def close_async 0)
    // (defun (close: nil) [(fd: int)])
    #[instrument(skip_all, fields(handle = %handle))]
    pub async fn close(&self, handle: Handle) -> Result<()> {
        let Some(entry) = self.release(handle) else {
            trace!("close on unknown handle");
            return Ok(());
        };
        let kind = entry.kind();
        match entry {
            Slot::File(file) => file
                .close(self.config.mode)
                .await
                .with_context(|| format!("close file handle {handle}"))?,
            Slot::Listener(listener) => listener.close(),
            Slot::Connection(conn) => conn.close(self.config.mode).await,
        }
        debug!(%kind, "handle closed");
        Ok(())
    }

    // (def read_async 1)
    // (defun (read: int[]) [(fd: int)])
    pub async fn read(&self, handle: Handle) -> Result<Vec<u8>> {
        self.read_with(handle, |bytes| bytes.to_vec()).await
    }

    /// Read the next chunk from a file or connection and lend it to `f`.
    ///
    /// The slice borrows the handle's reusable buffer, so it cannot outlive
    /// the call. Empty means end-of-stream, or a handle that is not a file or
    /// connection.
    #[instrument(skip_all, fields(handle = %handle))]
    pub async fn read_with<T>(&self, handle: Handle, f: impl FnOnce(&[u8]) -> T) -> Result<T> {
        match self.lookup(handle) {
            Some(Slot::File(file)) => file
                .read_with(f)
                .await
                .with_context(|| format!("read handle {handle}")),
            Some(Slot::Connection(conn)) => conn
                .read_with(f)
                .await
                .with_context(|| format!("read handle {handle}")),
            Some(Slot::Listener(_)) | None => {
                trace!("read on non-readable handle");
                Ok(f(&[]))
            }
        }
    }

    // (def write_async 1)
    // (defun (write: nil) [(fd: int) (data: int[])])
    #[instrument(skip_all, fields(handle = %handle, len = data.len()))]
    pub async fn write(&self, handle: Handle, data: &[u8]) -> Result<()> {
        match self.lookup(handle) {
            Some(Slot::File(file)) => file
                .write(data)
                .await
                .with_context(|| format!("write handle {handle}")),
            Some(Slot::Connection(conn)) => conn
                .write(data)
                .await
                .with_context(|| format!("write handle {handle}")),
            Some(Slot::Listener(_)) | None => {
                trace!("write on non-writable handle");
                Ok(())
            }
        }
    }

    // (def unlink_async 0)
    // (defun (unlink: nil) [(path: string)])
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn unlink(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let removed = if self.config.mode.suspends(Op::Unlink) {
            tokio::fs::remove_file(path).await
        } else {
            std::fs::remove_file(path)
        };
        removed.with_context(|| format!("unlink {}", path.display()))
    }

    // (def listen_async 0)
    // (defun (listen: int) [(address: string)])
    #[instrument(skip_all, fields(address = %address))]
    pub async fn listen(&self, address: &str) -> Handle {
        let Some(endpoint) = self.endpoint(address) else {
            return Handle::INVALID;
        };
        match ListenerEntry::bind(&endpoint, self.config.mode, self.config.buffer_size).await {
            Ok(entry) => {
                let local = entry.local_addr().ok();
                let handle = self.register(Slot::Listener(Arc::new(entry)));
                debug!(%handle, ?local, "listening");
                handle
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "listen failed");
                Handle::INVALID
            }
        }
    }

    // (def accept_async 1)
    // (defun (accept: int) [(listener: int)])
    #[instrument(skip_all, fields(listener = %listener))]
    pub async fn accept(&self, listener: Handle) -> Handle {
        let Some(Slot::Listener(entry)) = self.lookup(listener) else {
            trace!("accept on non-listener handle");
            return Handle::INVALID;
        };
        match entry.accept().await {
            None => {
                debug!("listener closed while accepting");
                Handle::INVALID
            }
            Some(Err(err)) => {
                debug!(error = %err, "accept failed");
                Handle::INVALID
            }
            Some(Ok((stream, peer))) => {
                let conn = ConnectionEntry::new(stream, self.config.buffer_size);
                let handle = self.register(Slot::Connection(Arc::new(conn)));
                debug!(%handle, %peer, "connection accepted");
                handle
            }
        }
    }

    // (def connect_async 1)
    // (defun (connect: int) [(address: string)])
    #[instrument(skip_all, fields(address = %address))]
    pub async fn connect(&self, address: &str) -> Handle {
        let Some(endpoint) = self.endpoint(address) else {
            return Handle::INVALID;
        };
        match ConnectionEntry::connect(&endpoint, self.config.buffer_size).await {
            Ok(conn) => {
                let peer = conn.peer_addr();
                let handle = self.register(Slot::Connection(Arc::new(conn)));
                debug!(%handle, ?peer, "connected");
                handle
            }
            Err(err) => {
                debug!(error = %format!("{err:#}"), "connect failed");
                Handle::INVALID
            }
        }
    }

    fn endpoint(&self, address: &str) -> Option<Endpoint> {
        let endpoint = parse_address(address, &self.config.wildcard_host);
        if endpoint.is_none() {
            debug!("malformed address");
        }
        endpoint
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, entry: Entry) -> Handle {
        self.table().insert(entry)
    }

    fn lookup(&self, handle: Handle) -> Option<Entry> {
        self.table().get(handle)
    }

    fn release(&self, handle: Handle) -> Option<Entry> {
        self.table().remove(handle)
    }
}
