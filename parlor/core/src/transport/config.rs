//! Transport Configuration
//!
//! Where the remote peer lives and how it signals the end of multi-line input.

use serde::{Deserialize, Serialize};

/// End-of-transmission byte, what a terminal sends for ctrl-d
pub const DEFAULT_END_OF_INPUT: &str = "\u{4}";

/// Transport configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// WebSocket endpoint of the remote peer
    ///
    /// `ws://` works out of the box; `wss://` needs the `tls` feature.
    pub endpoint: String,

    /// Frame the peer sends to end a multi-line reply
    pub end_of_input: String,

    /// Connection timeout in milliseconds
    ///
    /// Bounds the handshake only. Waiting for replies is never timed out.
    pub connect_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8080/ws".to_string(),
            end_of_input: DEFAULT_END_OF_INPUT.to_string(),
            connect_timeout_ms: 5000,
        }
    }
}

impl TransportConfig {
    /// Create configuration for a specific endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `PARLOR_ENDPOINT`: WebSocket endpoint
    /// - `PARLOR_END_OF_INPUT`: multi-line sentinel frame
    /// - `PARLOR_CONNECT_TIMEOUT`: handshake timeout in ms
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Apply environment overrides on top of this configuration
    #[must_use]
    pub fn overlay_env(self) -> Self {
        Self {
            endpoint: std::env::var("PARLOR_ENDPOINT").unwrap_or(self.endpoint),
            end_of_input: std::env::var("PARLOR_END_OF_INPUT").unwrap_or(self.end_of_input),
            connect_timeout_ms: std::env::var("PARLOR_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.connect_timeout_ms),
        }
    }

    /// Human-readable hint appended to multi-line prompt labels
    pub fn end_of_input_hint(&self) -> String {
        if self.end_of_input == DEFAULT_END_OF_INPUT {
            "ctrl-d/z on empty line to end".to_string()
        } else {
            format!("send '{}' to end", self.end_of_input)
        }
    }
}
