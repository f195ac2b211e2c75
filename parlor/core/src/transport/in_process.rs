//! In-Process Transport
//!
//! Direct channel-based Transport Session. The peer side is a [`PeerHandle`]
//! held by whatever plays the remote user: an embedding application, or a
//! test scripting replies.
//!
//! # Usage
//!
//! ```ignore
//! let (transport, peer) = InProcessTransport::new_pair();
//!
//! peer.reply("line one");
//! peer.end_of_input("\u{4}");
//!
//! // hand `transport` to the input bridge
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::traits::{InboundFrame, PromptTransport, TransportError};

/// In-process transport using crossbeam channels
pub struct InProcessTransport {
    /// Prompts headed for the peer
    outbound_tx: Sender<String>,
    /// Frames coming from the peer
    inbound_rx: Receiver<InboundFrame>,
    /// Connection state, shared with the peer
    connected: Arc<AtomicBool>,
}

/// Remote side of an [`InProcessTransport`]
#[derive(Clone)]
pub struct PeerHandle {
    outbound_rx: Receiver<String>,
    inbound_tx: Sender<InboundFrame>,
    connected: Arc<AtomicBool>,
}

impl InProcessTransport {
    /// Create a new in-process transport pair
    ///
    /// Returns:
    /// - `InProcessTransport`: give this to the input bridge
    /// - `PeerHandle`: reads prompts, injects replies
    #[must_use]
    pub fn new_pair() -> (Self, PeerHandle) {
        let (outbound_tx, outbound_rx) = unbounded();
        let (inbound_tx, inbound_rx) = unbounded();
        let connected = Arc::new(AtomicBool::new(true));

        let transport = Self {
            outbound_tx,
            inbound_rx,
            connected: Arc::clone(&connected),
        };
        let peer = PeerHandle {
            outbound_rx,
            inbound_tx,
            connected,
        };

        (transport, peer)
    }
}

impl PromptTransport for InProcessTransport {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        }

        self.outbound_tx
            .send(text.to_string())
            .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
    }

    fn inbound(&self) -> &Receiver<InboundFrame> {
        &self.inbound_rx
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl PeerHandle {
    /// Send a text frame to the prompting side
    pub fn reply(&self, text: impl Into<String>) {
        let _ = self.inbound_tx.send(InboundFrame::Text(text.into()));
    }

    /// Send the multi-line sentinel frame
    pub fn end_of_input(&self, sentinel: &str) {
        self.reply(sentinel);
    }

    /// Close the connection from the peer side
    pub fn hang_up(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let _ = self.inbound_tx.send(InboundFrame::Closed);
    }

    /// Report a broken connection
    pub fn fail(&self, reason: impl Into<String>) {
        self.connected.store(false, Ordering::SeqCst);
        let _ = self.inbound_tx.send(InboundFrame::Failed(reason.into()));
    }

    /// Prompts sent by the prompting side, in order
    pub fn prompts(&self) -> &Receiver<String> {
        &self.outbound_rx
    }

    /// Whether the prompting side still considers the session open
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
