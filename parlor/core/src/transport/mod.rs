//! Transport Layer for Remote Input
//!
//! Provides the Transport Session the console uses to source user input from
//! a remote peer:
//! - `WebSocketSession`: persistent WebSocket client on a dedicated worker
//! - `InProcessTransport`: direct channel pair (embedding and tests)
//!
//! # Design Philosophy
//!
//! Prompting is synchronous from the chat loop's point of view, while the
//! only way to obtain the answer is an asynchronous receive. All async work
//! lives on the `parlor-transport` worker thread; callers hand frames over
//! through channels and block on the handoff, never on socket machinery.
//!
//! # Failure model
//!
//! A session is opened once before the first prompt and is never
//! reconnected. A dropped connection surfaces as an error to the caller,
//! since a silent reconnect would lose the conversation's context.

pub mod config;
pub mod in_process;
pub mod traits;
pub mod websocket;

// Re-exports for convenience
pub use config::{TransportConfig, DEFAULT_END_OF_INPUT};
pub use in_process::{InProcessTransport, PeerHandle};
pub use traits::{InboundFrame, PromptTransport, TransportError};
pub use websocket::WebSocketSession;
