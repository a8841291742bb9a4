//! Connection driver.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::address::Endpoint;
use crate::core::mode::{CallMode, Op};
use crate::io::signal::CloseSignal;
use crate::io::transfer::{read_some, write_fully};

/// A connected TCP socket, split so a pending read never blocks a write.
#[derive(Debug)]
pub struct ConnectionEntry {
    reader: Mutex<ReadState>,
    writer: Mutex<OwnedWriteHalf>,
    closed: CloseSignal,
    peer: Option<SocketAddr>,
}

#[derive(Debug)]
struct ReadState {
    half: OwnedReadHalf,
    buf: Box<[u8]>,
}

impl ConnectionEntry {
    /// Wrap an established stream (from `accept` or `connect`).
    pub fn new(stream: TcpStream, buffer_size: usize) -> Self {
        let peer = stream.peer_addr().ok();
        let (half, writer) = stream.into_split();
        Self {
            reader: Mutex::new(ReadState {
                half,
                buf: vec![0; buffer_size].into_boxed_slice(),
            }),
            writer: Mutex::new(writer),
            closed: CloseSignal::new(),
            peer,
        }
    }

    pub async fn connect(endpoint: &Endpoint, buffer_size: usize) -> Result<Self> {
        let stream = TcpStream::connect(endpoint.as_pair())
            .await
            .with_context(|| format!("connect {endpoint}"))?;
        Ok(Self::new(stream, buffer_size))
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Read the next chunk and lend it to `f`.
    ///
    /// An empty slice means the peer finished sending, or the connection was
    /// closed locally while the read was pending.
    pub async fn read_with<T>(&self, f: impl FnOnce(&[u8]) -> T) -> Result<T> {
        let mut state = self.reader.lock().await;
        let ReadState { half, buf } = &mut *state;
        let received = tokio::select! {
            biased;
            _ = self.closed.raised() => Ok(0),
            received = read_some(half, buf) => received,
        };
        let n = received.context("read connection")?;
        Ok(f(&buf[..n]))
    }

    /// Send all of `data`. A local close while sending ends the call quietly.
    pub async fn write(&self, data: &[u8]) -> Result<()> {
        let mut half = self.writer.lock().await;
        tokio::select! {
            biased;
            _ = self.closed.raised() => {
                debug!(peer = ?self.peer, "write abandoned, connection closed");
                Ok(())
            }
            written = write_fully(&mut *half, data) => written.context("write connection"),
        }
    }

    /// Wake pending transfers, then shut down the sending side.
    ///
    /// Shutdown failures are logged, not returned: the entry is already gone
    /// from the table and there is nothing the caller could retry.
    pub async fn close(&self, call: CallMode) {
        self.closed.raise();
        if !call.suspends(Op::Close) {
            return;
        }
        let mut half = self.writer.lock().await;
        if let Err(err) = half.shutdown().await {
            debug!(peer = ?self.peer, error = %err, "connection shutdown failed");
        }
    }
}
