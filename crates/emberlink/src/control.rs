//! The disconnect handle shared between the client and its handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A cloneable handle for requesting disconnection.
///
/// Handlers receive one at construction (dependency injection — no
/// process-wide singletons), which lets a handler such as the
/// server-error handler tear down the very connection it is running
/// inside of. The read loop observes the request through
/// [`closed`](Self::closed) and exits without invoking any further
/// handlers.
///
/// `request_disconnect` is idempotent and safe from any task or thread.
#[derive(Clone)]
pub struct ConnectionControl {
    inner: Arc<ControlInner>,
}

struct ControlInner {
    closing: AtomicBool,
    notify: Notify,
}

impl ConnectionControl {
    /// Creates a fresh handle in the "open" state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ControlInner {
                closing: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Requests disconnection. Returns `true` only for the first call
    /// since the last [`reset`](Self::reset); repeated calls are no-ops.
    pub fn request_disconnect(&self) -> bool {
        let first = !self.inner.closing.swap(true, Ordering::AcqRel);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    /// Whether disconnection has been requested.
    pub fn is_closing(&self) -> bool {
        self.inner.closing.load(Ordering::Acquire)
    }

    /// Re-arms the handle for a new connection attempt.
    pub(crate) fn reset(&self) {
        self.inner.closing.store(false, Ordering::Release);
    }

    /// Resolves once disconnection has been requested.
    pub async fn closed(&self) {
        // `notify_waiters` only wakes registered waiters, so register
        // with `enable` before checking the flag; a request landing in
        // between is then guaranteed to wake the await below.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_closing() {
            return;
        }
        notified.await;
    }
}

impl Default for ConnectionControl {
    fn default() -> Self {
        Self::new()
    }
}
