//! Operator Interrupt
//!
//! A latched Ctrl-C flag that can also be waited on. Renderers poll
//! [`InterruptSignal::is_raised`] between snapshots; blocking waits put
//! [`InterruptSignal::receiver`] into a `select!` next to their data channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

/// Cloneable handle to the process interrupt state
#[derive(Clone, Debug)]
pub struct InterruptSignal {
    raised: Arc<AtomicBool>,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl InterruptSignal {
    /// Create a signal that is only raised through [`InterruptSignal::trigger`]
    #[must_use]
    pub fn new() -> Self {
        // One pending notification is enough; waiters also check the latch.
        let (tx, rx) = bounded(1);
        Self {
            raised: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Create a signal and route Ctrl-C to it
    ///
    /// # Errors
    ///
    /// Fails if a Ctrl-C handler is already registered for this process.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let signal = Self::new();
        let handler = signal.clone();
        ctrlc::set_handler(move || handler.trigger())?;
        tracing::debug!("Ctrl-C handler installed");
        Ok(signal)
    }

    /// Raise the interrupt
    pub fn trigger(&self) {
        self.raised.store(true, Ordering::SeqCst);
        let _ = self.tx.try_send(());
    }

    /// Whether the interrupt has been raised
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Notification channel for use in `crossbeam_channel::select!`
    ///
    /// A waiter that wakes on this receiver consumes the notification; the
    /// latch returned by [`InterruptSignal::is_raised`] stays set.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

impl Default for InterruptSignal {
    fn default() -> Self {
        Self::new()
    }
}
