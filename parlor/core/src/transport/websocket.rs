//! WebSocket Transport Session
//!
//! Client-side WebSocket session running on a dedicated worker thread.
//!
//! # Architecture
//!
//! ```text
//!   caller thread                      parlor-transport thread
//!   ─────────────                      ───────────────────────
//!   send_text ──▶ mpsc::Unbounded ──▶  select! { outbound ─▶ sink.send  }
//!   recv      ◀── crossbeam inbound ◀─ select! { source.next ─▶ frame }
//! ```
//!
//! The worker owns a current-thread tokio runtime and the socket. The handshake
//! completes (or fails) before [`WebSocketSession::connect`] returns, so a bad
//! endpoint is reported at startup rather than at the first prompt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::config::TransportConfig;
use super::traits::{InboundFrame, PromptTransport, TransportError};

/// Commands from the caller to the worker
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Persistent WebSocket connection to the remote peer
pub struct WebSocketSession {
    /// Endpoint this session is connected to
    endpoint: String,
    /// Commands for the worker
    outbound_tx: mpsc::UnboundedSender<Outbound>,
    /// Frames received by the worker
    inbound_rx: Receiver<InboundFrame>,
    /// Whether the socket is open
    connected: Arc<AtomicBool>,
    /// Worker thread, taken on close
    worker: Option<JoinHandle<()>>,
}

impl WebSocketSession {
    /// Open the session and wait for the handshake
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ConnectionFailed` if the worker cannot be
    /// started, the endpoint refuses the connection, or the handshake does not
    /// finish within `connect_timeout_ms`.
    pub fn connect(config: &TransportConfig) -> Result<Self, TransportError> {
        let endpoint = config.endpoint.clone();
        let timeout = Duration::from_millis(config.connect_timeout_ms);

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);
        let connected = Arc::new(AtomicBool::new(false));

        let worker_endpoint = endpoint.clone();
        let worker_connected = Arc::clone(&connected);
        let worker = thread::Builder::new()
            .name("parlor-transport".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = ready_tx.send(Err(TransportError::Io(e)));
                        return;
                    }
                };

                runtime.block_on(run_session(
                    worker_endpoint,
                    timeout,
                    outbound_rx,
                    inbound_tx,
                    ready_tx,
                    worker_connected,
                ));
            })
            .map_err(|e| {
                TransportError::ConnectionFailed(format!("Failed to spawn transport worker: {e}"))
            })?;

        let handshake = ready_rx.recv().unwrap_or_else(|_| {
            Err(TransportError::ConnectionFailed(
                "Transport worker exited during handshake".to_string(),
            ))
        });
        if let Err(e) = handshake {
            let _ = worker.join();
            return Err(e);
        }

        Ok(Self {
            endpoint,
            outbound_tx,
            inbound_rx,
            connected,
            worker: Some(worker),
        })
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PromptTransport for WebSocketSession {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed);
        }

        self.outbound_tx
            .send(Outbound::Text(text.to_string()))
            .map_err(|_| TransportError::SendFailed("Transport worker stopped".to_string()))
    }

    fn inbound(&self) -> &Receiver<InboundFrame> {
        &self.inbound_rx
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        // The worker may already be gone if the peer hung up first.
        let _ = self.outbound_tx.send(Outbound::Close);
        worker
            .join()
            .map_err(|_| TransportError::InvalidState("Transport worker panicked".to_string()))?;
        self.connected.store(false, Ordering::SeqCst);

        tracing::info!(endpoint = %self.endpoint, "Transport session closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Drop for WebSocketSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "Failed to close transport session");
        }
    }
}

/// Worker body: handshake, then pump frames until either side closes
async fn run_session(
    endpoint: String,
    timeout: Duration,
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    inbound_tx: Sender<InboundFrame>,
    ready_tx: Sender<Result<(), TransportError>>,
    connected: Arc<AtomicBool>,
) {
    let stream = match tokio::time::timeout(timeout, connect_async(endpoint.as_str())).await {
        Ok(Ok((stream, _response))) => stream,
        Ok(Err(e)) => {
            let _ = ready_tx.send(Err(TransportError::ConnectionFailed(format!(
                "Failed to connect to {endpoint}: {e}"
            ))));
            return;
        }
        Err(_) => {
            let _ = ready_tx.send(Err(TransportError::ConnectionFailed(format!(
                "Timed out connecting to {endpoint}"
            ))));
            return;
        }
    };

    connected.store(true, Ordering::SeqCst);
    let _ = ready_tx.send(Ok(()));
    tracing::info!(endpoint = %endpoint, "Transport session open");

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            command = outbound_rx.recv() => match command {
                Some(Outbound::Text(text)) => {
                    tracing::debug!(bytes = text.len(), "Sending frame");
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        tracing::warn!(error = %e, "Write error");
                        let _ = inbound_tx.send(InboundFrame::Failed(e.to_string()));
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    tracing::debug!("Closing connection");
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(bytes = text.len(), "Received frame");
                    let _ = inbound_tx.send(InboundFrame::Text(text));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    tracing::debug!(bytes = bytes.len(), "Received binary frame, decoding as text");
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    let _ = inbound_tx.send(InboundFrame::Text(text));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "Connection closed by peer");
                    let _ = inbound_tx.send(InboundFrame::Closed);
                    break;
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Read error");
                    let _ = inbound_tx.send(InboundFrame::Failed(e.to_string()));
                    break;
                }
                None => {
                    tracing::debug!("Stream ended");
                    let _ = inbound_tx.send(InboundFrame::Closed);
                    break;
                }
            },
        }
    }

    connected.store(false, Ordering::SeqCst);
}
