//! Transport Traits
//!
//! The synchronous-facing contract shared by every Transport Session.

use crossbeam_channel::{select, Receiver};
use thiserror::Error;

use crate::interrupt::InterruptSignal;

/// A frame received from the remote peer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundFrame {
    /// An opaque text message
    Text(String),
    /// The peer closed the connection gracefully
    Closed,
    /// The connection failed
    Failed(String),
}

/// Errors that can occur during transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the peer failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Connection was closed
    #[error("Connection closed")]
    ConnectionClosed,
    /// Failed to send a message
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// Failed to receive a message
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
    /// Transport not in the expected state
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// The operator interrupted a wait
    #[error("Interrupted while waiting for the peer")]
    Interrupted,
    /// IO error from the underlying transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport Session as seen by the prompting side
///
/// Implementations keep their asynchronous machinery out of sight: `send_text`
/// queues a frame and returns, and inbound frames arrive on a plain channel.
pub trait PromptTransport: Send {
    /// Queue one outbound text frame
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;

    /// Channel carrying inbound frames in arrival order
    fn inbound(&self) -> &Receiver<InboundFrame>;

    /// Close the session
    ///
    /// Closing an already closed session is a no-op.
    fn close(&mut self) -> Result<(), TransportError>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;

    /// Block until the next inbound frame or an interrupt
    ///
    /// There is no timeout: a silent peer blocks until the operator
    /// interrupts. A disconnected channel reads as [`InboundFrame::Closed`].
    fn recv(&self, interrupt: &InterruptSignal) -> Result<InboundFrame, TransportError> {
        if interrupt.is_raised() {
            return Err(TransportError::Interrupted);
        }
        select! {
            recv(self.inbound()) -> frame => Ok(frame.unwrap_or(InboundFrame::Closed)),
            recv(interrupt.receiver()) -> _ => Err(TransportError::Interrupted),
        }
    }
}
