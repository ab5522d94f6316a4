//! Bounded queues with cooperative cancellation.
//!
//! Blocking operations wake at least every `poll_interval` to observe the
//! [`ShutdownToken`], so a cancelled take or publish returns promptly even
//! when the other side never shows up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};

use crate::batch::{Batch, NoiseEstimate};
use crate::error::QueueError;

/// Process-wide cancellation flag, shared by cloning
///
/// Monotonic: once cancelled it never resets.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            log::debug!("Shutdown requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Where a worker takes batches from
pub trait BatchSource: Send {
    /// Wait for the next batch.
    ///
    /// `Ok(None)` means nothing arrived yet and the caller should retry.
    fn take(&self, token: &ShutdownToken) -> Result<Option<Batch>, QueueError>;
}

/// Where a worker publishes its estimates
pub trait EstimateSink: Send {
    fn publish(&self, estimate: NoiseEstimate, token: &ShutdownToken) -> Result<(), QueueError>;
}

/// Create a bounded queue whose blocking operations poll the shutdown token.
pub fn queue<T>(capacity: usize, poll_interval: Duration) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (
        QueueSender { tx, poll_interval },
        QueueReceiver { rx, poll_interval },
    )
}

#[derive(Debug)]
pub struct QueueSender<T> {
    tx: Sender<T>,
    poll_interval: Duration,
}

#[derive(Debug)]
pub struct QueueReceiver<T> {
    rx: Receiver<T>,
    poll_interval: Duration,
}

// Derived Clone would require T: Clone
impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            poll_interval: self.poll_interval,
        }
    }
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            poll_interval: self.poll_interval,
        }
    }
}

impl<T> QueueSender<T> {
    /// Block until `item` is queued, the token is cancelled, or every
    /// receiver is gone.
    pub fn send(&self, item: T, token: &ShutdownToken) -> Result<(), QueueError> {
        let mut item = item;
        loop {
            if token.is_cancelled() {
                return Err(QueueError::Cancelled);
            }
            match self.tx.send_timeout(item, self.poll_interval) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(returned)) => item = returned,
                Err(SendTimeoutError::Disconnected(_)) => return Err(QueueError::Disconnected),
            }
        }
    }
}

impl<T> QueueReceiver<T> {
    /// Wait up to one poll interval for an item.
    pub fn recv(&self, token: &ShutdownToken) -> Result<Option<T>, QueueError> {
        if token.is_cancelled() {
            return Err(QueueError::Cancelled);
        }
        match self.rx.recv_timeout(self.poll_interval) {
            Ok(item) => Ok(Some(item)),
            Err(RecvTimeoutError::Timeout) if token.is_cancelled() => Err(QueueError::Cancelled),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(QueueError::Disconnected),
        }
    }

    /// Receive without waiting; used to drain after the producers are gone.
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl BatchSource for QueueReceiver<Batch> {
    fn take(&self, token: &ShutdownToken) -> Result<Option<Batch>, QueueError> {
        self.recv(token)
    }
}

impl EstimateSink for QueueSender<NoiseEstimate> {
    fn publish(&self, estimate: NoiseEstimate, token: &ShutdownToken) -> Result<(), QueueError> {
        self.send(estimate, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    const POLL: Duration = Duration::from_millis(5);

    #[test]
    fn test_token_is_shared_and_monotonic() {
        let token = ShutdownToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_recv_empty_is_not_an_error() {
        let (_tx, rx) = queue::<u32>(1, POLL);
        let token = ShutdownToken::new();
        assert_eq!(rx.recv(&token), Ok(None));
    }

    #[test]
    fn test_send_then_recv() {
        let (tx, rx) = queue::<u32>(1, POLL);
        let token = ShutdownToken::new();
        tx.send(7, &token).unwrap();
        assert_eq!(rx.recv(&token), Ok(Some(7)));
    }

    #[test]
    fn test_cancelled_operations_fail_fast() {
        let (tx, rx) = queue::<u32>(1, POLL);
        let token = ShutdownToken::new();
        tx.send(1, &token).unwrap();
        token.cancel();
        assert_eq!(rx.recv(&token), Err(QueueError::Cancelled));
        assert_eq!(tx.send(2, &token), Err(QueueError::Cancelled));
    }

    #[test]
    fn test_blocked_send_unblocks_on_cancel() {
        let (tx, _rx) = queue::<u32>(1, POLL);
        let token = ShutdownToken::new();
        tx.send(1, &token).unwrap();

        let canceller = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });

        let start = Instant::now();
        assert_eq!(tx.send(2, &token), Err(QueueError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(1));
        handle.join().unwrap();
    }

    #[test]
    fn test_disconnect_reported() {
        let (tx, rx) = queue::<u32>(1, POLL);
        let token = ShutdownToken::new();
        drop(tx);
        assert_eq!(rx.recv(&token), Err(QueueError::Disconnected));

        let (tx, rx) = queue::<u32>(1, POLL);
        drop(rx);
        assert_eq!(tx.send(1, &token), Err(QueueError::Disconnected));
    }
}
