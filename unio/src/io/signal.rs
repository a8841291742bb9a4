//! One-shot close notification shared between `close` and pending I/O.

use tokio::sync::watch;

/// Raised once when an entry is closed; never lowered.
///
/// Backed by a `watch` channel so a waiter that subscribes after the signal
/// was raised still observes it.
#[derive(Debug)]
pub struct CloseSignal {
    tx: watch::Sender<bool>,
}

impl Default for CloseSignal {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }
}

impl CloseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`raise`](Self::raise) has been called.
    pub async fn raised(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|closed| *closed).await;
    }
}
