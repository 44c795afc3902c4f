use tokio::sync::watch;

// ============================================================================
// Cancellation Signal
// ============================================================================
//
// Handlers check the signal between I/O steps and race their commit against
// it. A cancelled handler returns `Cancelled` before anything is committed.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled before commit")]
pub struct Cancelled;

/// Owner side: flips the signal for every clone of the paired receiver.
#[derive(Debug)]
pub struct CancellationHandle {
    tx: watch::Sender<bool>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        // send_replace never fails even when every receiver is gone
        self.tx.send_replace(true);
    }
}

/// Receiver side, cheap to clone and pass down to handlers.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// Create a linked handle/signal pair.
    pub fn new() -> (CancellationHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancellationHandle { tx }, Self { rx })
    }

    /// A signal that can never fire.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once cancellation is requested. Pends forever if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::never()
    }
}
