//! Chat I/O Variants
//!
//! One capability set, four implementations:
//!
//! | Style          | Input                      | Output                 |
//! |----------------|----------------------------|------------------------|
//! | `simple`       | stdin, line or multi-line  | plain word chunks      |
//! | `remote`       | WebSocket input bridge     | plain word chunks      |
//! | `rich`         | line editor                | live markdown          |
//! | `programmatic` | file re-read every turn    | plain word chunks      |
//!
//! The chat loop only sees [`ChatIo`]; [`build`] picks the variant from the
//! configured style.

mod bridged;
mod direct;
mod fixed_file;
mod rich;

pub use bridged::BridgedChatIo;
pub use direct::DirectChatIo;
pub use fixed_file::FixedFileChatIo;
pub use rich::RichChatIo;

use std::io::{self, Write};

use anyhow::Context;
use parlor_core::{GenerationSnapshot, InterruptSignal, WebSocketSession};

use crate::bridge::InputBridge;
use crate::config::{ConsoleConfig, ConsoleStyle};
use crate::error::ConsoleError;
use crate::input::{RichInput, StdinLines};
use crate::render::{MarkdownLiveRenderer, PlainRenderer};

/// Console capabilities used by the chat loop
pub trait ChatIo {
    /// Obtain the next message for `role`
    fn prompt_for_input(&mut self, role: &str) -> Result<String, ConsoleError>;

    /// Announce that `role` is about to answer
    fn prompt_for_output(&mut self, role: &str) -> Result<(), ConsoleError>;

    /// Display a snapshot stream and return the full answer
    fn stream_output(
        &mut self,
        snapshots: &mut dyn Iterator<Item = GenerationSnapshot>,
    ) -> Result<String, ConsoleError>;

    /// Show a one-line notice to the operator
    fn announce(&mut self, message: &str) -> Result<(), ConsoleError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{message}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Create the console variant for `config.style`
///
/// The remote style connects before returning; a failed connection is an
/// error here rather than on the first prompt.
pub fn build(
    config: &ConsoleConfig,
    interrupt: &InterruptSignal,
) -> anyhow::Result<Box<dyn ChatIo>> {
    tracing::info!(style = ?config.style, multiline = config.multiline, "Starting console");

    let io: Box<dyn ChatIo> = match config.style {
        ConsoleStyle::Simple => {
            let stdin = StdinLines::spawn().context("Failed to start stdin reader")?;
            Box::new(DirectChatIo::new(
                stdin,
                PlainRenderer::new(io::stdout()),
                config.multiline,
                interrupt.clone(),
            ))
        }
        ConsoleStyle::Remote => {
            let session = WebSocketSession::connect(&config.transport).with_context(|| {
                format!("Failed to connect to {}", config.transport.endpoint)
            })?;
            let bridge = InputBridge::new(
                session,
                &config.transport,
                config.multiline,
                interrupt.clone(),
            );
            Box::new(BridgedChatIo::new(
                bridge,
                PlainRenderer::new(io::stdout()),
                interrupt.clone(),
            ))
        }
        ConsoleStyle::Rich => Box::new(RichChatIo::new(
            RichInput::new(config.history_size, config.multiline),
            MarkdownLiveRenderer::new(io::stdout(), config.refresh_interval()),
            interrupt.clone(),
        )),
        ConsoleStyle::Programmatic => {
            let path = if config.input_file.is_absolute() {
                config.input_file.clone()
            } else {
                std::env::current_dir()
                    .context("Failed to resolve working directory")?
                    .join(&config.input_file)
            };
            Box::new(FixedFileChatIo::new(
                path,
                PlainRenderer::new(io::stdout()),
                interrupt.clone(),
            ))
        }
    };

    Ok(io)
}
