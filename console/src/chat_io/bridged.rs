//! Bridged console: remote input, local plain output
//!
//! Every answer received from the remote operator is echoed locally so the
//! console shows the whole conversation.

use std::io::Write;

use parlor_core::{GenerationSnapshot, InterruptSignal, PromptTransport};

use super::ChatIo;
use crate::bridge::InputBridge;
use crate::error::ConsoleError;
use crate::render::PlainRenderer;

pub struct BridgedChatIo<T: PromptTransport, W: Write> {
    bridge: InputBridge<T>,
    renderer: PlainRenderer<W>,
    interrupt: InterruptSignal,
}

impl<T: PromptTransport, W: Write> BridgedChatIo<T, W> {
    pub fn new(bridge: InputBridge<T>, renderer: PlainRenderer<W>, interrupt: InterruptSignal) -> Self {
        Self {
            bridge,
            renderer,
            interrupt,
        }
    }

    pub fn bridge(&self) -> &InputBridge<T> {
        &self.bridge
    }

    pub fn into_renderer(self) -> PlainRenderer<W> {
        self.renderer
    }
}

impl<T: PromptTransport, W: Write> ChatIo for BridgedChatIo<T, W> {
    fn prompt_for_input(&mut self, role: &str) -> Result<String, ConsoleError> {
        let text = self.bridge.prompt(role)?;
        let sink = self.renderer.sink_mut();
        writeln!(sink, "{role}: {text}")?;
        sink.flush()?;
        Ok(text)
    }

    fn prompt_for_output(&mut self, role: &str) -> Result<(), ConsoleError> {
        let sink = self.renderer.sink_mut();
        write!(sink, "{role}: ")?;
        sink.flush()?;
        Ok(())
    }

    fn stream_output(
        &mut self,
        snapshots: &mut dyn Iterator<Item = GenerationSnapshot>,
    ) -> Result<String, ConsoleError> {
        self.renderer.stream(snapshots, &self.interrupt)
    }

    fn announce(&mut self, message: &str) -> Result<(), ConsoleError> {
        let sink = self.renderer.sink_mut();
        writeln!(sink, "{message}")?;
        sink.flush()?;
        Ok(())
    }
}
