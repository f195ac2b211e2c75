//! Parlor Console
//!
//! Terminal front-end for streaming text generation. Reads operator messages
//! from one of several sources and shows generated answers as they grow.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────── chat_loop ─────────────────────────────┐
//! │                                                                     │
//! │   Generator ──► snapshots ──► ChatIo::stream_output                 │
//! │                                   │                                 │
//! │             ┌─────────────┬───────┴──────┬──────────────┐           │
//! │             ▼             ▼              ▼              ▼           │
//! │          Direct        Bridged         Rich         FixedFile       │
//! │        stdin lines   InputBridge    line editor    file re-read     │
//! │        PlainRenderer PlainRenderer  Markdown live  PlainRenderer    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous. The only async code lives behind
//! `parlor_core::WebSocketSession`, on its own thread.

pub mod bridge;
pub mod chat_io;
pub mod chat_loop;
pub mod config;
pub mod error;
pub mod generator;
pub mod input;
pub mod render;

pub use bridge::InputBridge;
pub use chat_io::{build, ChatIo};
pub use chat_loop::{Conversation, Generator, Roles};
pub use config::{ConsoleConfig, ConsoleStyle};
pub use error::ConsoleError;
pub use generator::EchoGenerator;
