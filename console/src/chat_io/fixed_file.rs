//! Fixed-file console
//!
//! Every input prompt re-reads the whole file, so an external program can
//! rewrite it between turns. Prompts are tagged `[!OP:<role>]` for scripts
//! that parse the output.

use std::io::Write;
use std::path::PathBuf;

use parlor_core::{GenerationSnapshot, InterruptSignal};

use super::ChatIo;
use crate::error::ConsoleError;
use crate::render::PlainRenderer;

pub struct FixedFileChatIo<W: Write> {
    path: PathBuf,
    renderer: PlainRenderer<W>,
    interrupt: InterruptSignal,
}

impl<W: Write> FixedFileChatIo<W> {
    pub fn new(path: PathBuf, renderer: PlainRenderer<W>, interrupt: InterruptSignal) -> Self {
        Self {
            path,
            renderer,
            interrupt,
        }
    }

    pub fn into_renderer(self) -> PlainRenderer<W> {
        self.renderer
    }
}

impl<W: Write> ChatIo for FixedFileChatIo<W> {
    fn prompt_for_input(&mut self, role: &str) -> Result<String, ConsoleError> {
        if self.interrupt.is_raised() {
            return Err(ConsoleError::Interrupted);
        }
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| ConsoleError::InputFile {
                path: self.path.clone(),
                source,
            })?;

        let sink = self.renderer.sink_mut();
        writeln!(sink, "[!OP:{role}]: {contents}")?;
        sink.flush()?;
        Ok(contents)
    }

    fn prompt_for_output(&mut self, role: &str) -> Result<(), ConsoleError> {
        let sink = self.renderer.sink_mut();
        write!(sink, "[!OP:{role}]: ")?;
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
