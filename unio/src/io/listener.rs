//! Listener driver.

use std::io;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpStream};

use crate::core::address::Endpoint;
use crate::core::mode::{CallMode, Op};
use crate::io::signal::CloseSignal;

/// A bound, listening TCP socket.
#[derive(Debug)]
pub struct ListenerEntry {
    listener: TcpListener,
    closed: CloseSignal,
    scratch: Box<[u8]>,
}

impl ListenerEntry {
    /// Bind and start listening right away.
    pub async fn bind(endpoint: &Endpoint, call: CallMode, buffer_size: usize) -> Result<Self> {
        let listener = if call.suspends(Op::Listen) {
            TcpListener::bind(endpoint.as_pair())
                .await
                .with_context(|| format!("bind {endpoint}"))?
        } else {
            let std_listener = std::net::TcpListener::bind(endpoint.as_pair())
                .with_context(|| format!("bind {endpoint}"))?;
            std_listener
                .set_nonblocking(true)
                .context("set listener non-blocking")?;
            TcpListener::from_std(std_listener).context("register listener")?
        };
        Ok(Self {
            listener,
            closed: CloseSignal::new(),
            scratch: vec![0; buffer_size].into_boxed_slice(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn scratch_len(&self) -> usize {
        self.scratch.len()
    }

    /// Wait for the next inbound connection.
    ///
    /// Returns `None` once the listener has been closed, including when the
    /// close happens while this call is waiting.
    pub async fn accept(&self) -> Option<io::Result<(TcpStream, SocketAddr)>> {
        tokio::select! {
            biased;
            _ = self.closed.raised() => None,
            accepted = self.listener.accept() => Some(accepted),
        }
    }

    /// Stop accepting. The socket itself is released with the last reference.
    pub fn close(&self) {
        self.closed.raise();
    }
}
