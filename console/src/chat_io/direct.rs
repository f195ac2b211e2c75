//! Direct console: stdin in, plain chunks out

use std::io::Write;

use parlor_core::{GenerationSnapshot, InterruptSignal};

use super::ChatIo;
use crate::error::ConsoleError;
use crate::input::{LineEvent, StdinLines};
use crate::render::PlainRenderer;

const MULTILINE_HINT: &str = "ctrl-d/z on empty line to end";

pub struct DirectChatIo<W: Write> {
    stdin: StdinLines,
    renderer: PlainRenderer<W>,
    multiline: bool,
    interrupt: InterruptSignal,
}

impl<W: Write> DirectChatIo<W> {
    pub fn new(
        stdin: StdinLines,
        renderer: PlainRenderer<W>,
        multiline: bool,
        interrupt: InterruptSignal,
    ) -> Self {
        Self {
            stdin,
            renderer,
            multiline,
            interrupt,
        }
    }

    fn write_label(&mut self, label: &str) -> Result<(), ConsoleError> {
        let sink = self.renderer.sink_mut();
        write!(sink, "{label}")?;
        sink.flush()?;
        Ok(())
    }

    pub fn into_renderer(self) -> PlainRenderer<W> {
        self.renderer
    }
}

impl<W: Write> ChatIo for DirectChatIo<W> {
    /// Single-line: one line, or empty at end of input.
    /// Multi-line: every line until end of input, each trimmed.
    fn prompt_for_input(&mut self, role: &str) -> Result<String, ConsoleError> {
        if !self.multiline {
            self.write_label(&format!("{role}: "))?;
            return match self.stdin.next_line(&self.interrupt)? {
                LineEvent::Line(line) => Ok(line),
                LineEvent::Eof => Ok(String::new()),
            };
        }

        self.write_label(&format!("{role} [{MULTILINE_HINT}]: "))?;
        let mut lines = Vec::new();
        while let LineEvent::Line(line) = self.stdin.next_line(&self.interrupt)? {
            lines.push(line.trim().to_string());
        }
        Ok(lines.join("\n"))
    }

    fn prompt_for_output(&mut self, role: &str) -> Result<(), ConsoleError> {
        self.write_label(&format!("{role}: "))
    }

    fn stream_output(
        &mut self,
        snapshots: &mut dyn Iterator<Item = GenerationSnapshot>,
    ) -> Result<String, ConsoleError> {
        self.renderer.stream(snapshots, &self.interrupt)
    }

    fn announce(&mut self, message: &str) -> Result<(), ConsoleError> {
        self.write_label(&format!("{message}\n"))
    }
}
