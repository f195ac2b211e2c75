//! Parlor Core - Stream diffing and remote input plumbing
//!
//! This crate holds the parts of the parlor console that do not touch the
//! terminal directly:
//!
//! - [`streaming`]: cumulative generation snapshots and the word-level differ
//!   that turns them into append-only chunks
//! - [`transport`]: the persistent session used to source user input from a
//!   remote peer (WebSocket worker or in-process pair)
//! - [`interrupt`]: a Ctrl-C signal that blocking waits can select on
//!
//! # Threading model
//!
//! ```text
//!   chat loop (sync) ──send_text──▶ outbound queue ──▶ ┌──────────────────┐
//!                                                      │ parlor-transport │
//!   chat loop (sync) ◀──select!──── inbound frames ◀── │  tokio runtime   │
//!         ▲                                            └────────┬─────────┘
//!         └──── InterruptSignal (ctrl-c)                        │ websocket
//! ```
//!
//! The caller never sees a future. Every asynchronous operation runs on the
//! transport worker, and the caller blocks only on a channel handoff.

pub mod interrupt;
pub mod streaming;
pub mod transport;

pub use interrupt::InterruptSignal;
pub use streaming::{GenerationSnapshot, SnapshotDiffer, WordChunk};
pub use transport::{
    InProcessTransport, InboundFrame, PeerHandle, PromptTransport, TransportConfig,
    TransportError, WebSocketSession, DEFAULT_END_OF_INPUT,
};
