use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Default quiet period before raw search input becomes the active search text.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Coalesces rapidly-changing search input.
///
/// Every raw input cancels the pending timer and starts a new one; only when
/// the input has been quiet for the full window is the buffered value
/// delivered on the settled channel. Rapid typing therefore produces exactly
/// one settled value, carrying the last text entered.
pub struct SearchDebouncer {
    quiet_period: Duration,
    tx: UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Returns the debouncer and the receiving end of the settled channel.
    pub fn new(quiet_period: Duration) -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            SearchDebouncer {
                quiet_period,
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// Feed one raw input event. Restarts the countdown.
    pub fn input(&mut self, text: impl Into<String>) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let tx = self.tx.clone();
        let quiet_period = self.quiet_period;
        let text = text.into();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            // Receiver may have been dropped on shutdown; nothing to do then.
            let _ = tx.send(text);
        }));
    }

    /// Drop any pending countdown without delivering it.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
