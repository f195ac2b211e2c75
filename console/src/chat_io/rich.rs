//! Rich console: line editor in, live markdown out

use std::io::Write;

use console::style;
use parlor_core::{GenerationSnapshot, InterruptSignal};

use super::ChatIo;
use crate::error::ConsoleError;
use crate::input::RichInput;
use crate::render::MarkdownLiveRenderer;

pub struct RichChatIo<W: Write> {
    input: RichInput,
    renderer: MarkdownLiveRenderer<W>,
    interrupt: InterruptSignal,
}

impl<W: Write> RichChatIo<W> {
    pub fn new(
        input: RichInput,
        renderer: MarkdownLiveRenderer<W>,
        interrupt: InterruptSignal,
    ) -> Self {
        Self {
            input,
            renderer,
            interrupt,
        }
    }

    pub fn into_renderer(self) -> MarkdownLiveRenderer<W> {
        self.renderer
    }
}

impl<W: Write> ChatIo for RichChatIo<W> {
    fn prompt_for_input(&mut self, role: &str) -> Result<String, ConsoleError> {
        let text = self.input.read(role)?;
        if self.interrupt.is_raised() {
            return Err(ConsoleError::Interrupted);
        }
        writeln!(self.renderer.sink_mut())?;
        Ok(text)
    }

    fn prompt_for_output(&mut self, role: &str) -> Result<(), ConsoleError> {
        let sink = self.renderer.sink_mut();
        writeln!(sink, "{}", style(format!("{role}:")).bold())?;
        sink.flush()?;
        Ok(())
    }

    fn stream_output(
        &mut self,
        snapshots: &mut dyn Iterator<Item = GenerationSnapshot>,
    ) -> Result<String, ConsoleError> {
        self.renderer.render_loop(snapshots, &self.interrupt)
    }

    fn announce(&mut self, message: &str) -> Result<(), ConsoleError> {
        let sink = self.renderer.sink_mut();
        writeln!(sink, "{message}")?;
        sink.flush()?;
        Ok(())
    }
}
