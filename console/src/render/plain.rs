//! Plain Renderer
//!
//! Writes confirmed words the moment the differ releases them. Nothing is
//! ever erased, so a chunk is only written once it is known to be complete.

use std::io::{self, Write};

use parlor_core::{GenerationSnapshot, InterruptSignal, SnapshotDiffer, WordChunk};

use crate::error::ConsoleError;

/// Append-only renderer over any output sink
pub struct PlainRenderer<W: Write> {
    sink: W,
}

impl<W: Write> PlainRenderer<W> {
    /// Create a renderer writing to `sink`
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write one chunk after its separator, unbuffered
    pub fn render(&mut self, chunk: &WordChunk) -> io::Result<()> {
        write!(self.sink, "{}{}", chunk.separator, chunk.text)?;
        self.sink.flush()
    }

    /// Write the closing chunk (if any) and end the line
    pub fn finish(&mut self, closing: Option<&WordChunk>) -> io::Result<()> {
        if let Some(chunk) = closing {
            write!(self.sink, "{}{}", chunk.separator, chunk.text)?;
        }
        writeln!(self.sink)?;
        self.sink.flush()
    }

    /// End a partially written line before reporting an interrupt
    fn abandon(&mut self, differ: &SnapshotDiffer) -> Result<String, ConsoleError> {
        if differ.committed_words() > 0 {
            writeln!(self.sink)?;
            self.sink.flush()?;
        }
        Err(ConsoleError::Interrupted)
    }

    /// Drain a snapshot stream to the sink and return the full answer
    ///
    /// An interrupt stops the stream between snapshots; only chunks written
    /// before it remain on the sink, and a partial line is terminated.
    pub fn stream(
        &mut self,
        snapshots: &mut dyn Iterator<Item = GenerationSnapshot>,
        interrupt: &InterruptSignal,
    ) -> Result<String, ConsoleError> {
        let mut differ = SnapshotDiffer::new();

        for snapshot in snapshots {
            if interrupt.is_raised() {
                return self.abandon(&differ);
            }
            if let Some(chunk) = differ.push(&snapshot) {
                self.render(&chunk)?;
            }
        }
        if interrupt.is_raised() {
            return self.abandon(&differ);
        }

        tracing::debug!(
            snapshots = differ.snapshots_seen(),
            words = differ.committed_words(),
            "Stream finished"
        );
        let (closing, full) = differ.finish();
        self.finish(closing.as_ref())?;
        Ok(full)
    }

    /// Sink for prompt labels and notices
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the renderer, returning the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}
