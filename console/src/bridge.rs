//! Input Bridge
//!
//! Turns a [`PromptTransport`] into a blocking "ask for a message" call.
//!
//! # Protocol
//!
//! ```text
//! console                          remote operator
//!    │ ── "USER: " ───────────────────────► │   single-line
//!    │ ◄──────────────────── "hello" ────── │
//!
//!    │ ── "USER [hint]: " ────────────────► │   multi-line
//!    │ ◄──────────────────── "line one" ─── │
//!    │ ◄──────────────────── "line two" ─── │
//!    │ ◄──────────────────── EOT ────────── │
//! ```
//!
//! Any text frame is the single-line answer, empty included. In multi-line
//! mode each frame is trimmed and kept until the end-of-input sentinel or a
//! peer close. Ctrl-C closes the session.

use parlor_core::{InboundFrame, InterruptSignal, PromptTransport, TransportConfig, TransportError};

use crate::error::ConsoleError;

/// Blocking prompt over a transport session
pub struct InputBridge<T: PromptTransport> {
    transport: T,
    multiline: bool,
    end_of_input: String,
    end_hint: String,
    interrupt: InterruptSignal,
}

impl<T: PromptTransport> InputBridge<T> {
    pub fn new(
        transport: T,
        config: &TransportConfig,
        multiline: bool,
        interrupt: InterruptSignal,
    ) -> Self {
        Self {
            transport,
            multiline,
            end_of_input: config.end_of_input.clone(),
            end_hint: config.end_of_input_hint(),
            interrupt,
        }
    }

    /// Send the prompt label for `role` and wait for the answer
    pub fn prompt(&mut self, role: &str) -> Result<String, ConsoleError> {
        let result = if self.multiline {
            self.prompt_multiline(role)
        } else {
            self.prompt_single(role)
        };

        if matches!(&result, Err(e) if e.is_interrupt()) {
            tracing::info!(role, "Interrupted while waiting for remote input");
            if let Err(e) = self.transport.close() {
                tracing::warn!(error = %e, "Failed to close transport after interrupt");
            }
            return Err(ConsoleError::Interrupted);
        }
        result
    }

    fn prompt_single(&mut self, role: &str) -> Result<String, ConsoleError> {
        self.transport.send_text(&format!("{role}: "))?;

        match self.transport.recv(&self.interrupt)? {
            InboundFrame::Text(text) => Ok(text),
            InboundFrame::Closed => Err(TransportError::ConnectionClosed.into()),
            InboundFrame::Failed(reason) => Err(TransportError::ReceiveFailed(reason).into()),
        }
    }

    fn prompt_multiline(&mut self, role: &str) -> Result<String, ConsoleError> {
        self.transport
            .send_text(&format!("{role} [{}]: ", self.end_hint))?;

        let mut lines = Vec::new();
        loop {
            match self.transport.recv(&self.interrupt)? {
                InboundFrame::Text(text) => {
                    let line = text.trim();
                    if line == self.end_of_input {
                        break;
                    }
                    lines.push(line.to_string());
                }
                InboundFrame::Closed => {
                    tracing::debug!("Peer closed during multi-line input");
                    break;
                }
                InboundFrame::Failed(reason) => {
                    return Err(TransportError::ReceiveFailed(reason).into());
                }
            }
        }

        tracing::debug!(lines = lines.len(), "Multi-line input complete");
        Ok(lines.join("\n"))
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
