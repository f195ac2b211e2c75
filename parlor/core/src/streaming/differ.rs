//! Snapshot Differ
//!
//! Converts cumulative snapshots into append-only [`WordChunk`]s. Output lags
//! the generation frontier by exactly one word.
//!
//! Words are whitespace-delimited tokens, but chunks are cut from the raw
//! snapshot text, so newlines and runs of spaces survive into the output.

use super::{GenerationSnapshot, WordChunk};

/// Per-stream diff state
///
/// Create one differ per `stream_output` call. The committed word count is
/// private to that stream and is consumed by [`SnapshotDiffer::finish`].
#[derive(Debug, Default)]
pub struct SnapshotDiffer {
    /// Words already handed out as chunks
    committed: usize,
    /// Text of the most recent snapshot
    latest: String,
    /// Snapshots seen so far
    snapshots: usize,
}

impl SnapshotDiffer {
    /// Create a differ for a new stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next snapshot
    ///
    /// Returns the words that this snapshot proves complete: everything except
    /// the final token, minus what was already committed.
    pub fn push(&mut self, snapshot: &GenerationSnapshot) -> Option<WordChunk> {
        self.snapshots += 1;
        self.latest.clear();
        self.latest.push_str(&snapshot.text);

        let spans = token_spans(&self.latest);
        let settled = spans.len().saturating_sub(1);
        if settled <= self.committed {
            return None;
        }

        let chunk = cut_chunk(&self.latest, &spans, self.committed, settled);
        self.committed = settled;
        Some(chunk)
    }

    /// Number of words committed so far
    pub fn committed_words(&self) -> usize {
        self.committed
    }

    /// Number of snapshots pushed so far
    pub fn snapshots_seen(&self) -> usize {
        self.snapshots
    }

    /// Close the stream
    ///
    /// Returns the closing chunk (the words of the last snapshot not yet
    /// committed, held-back final word included) and the full answer: the last
    /// snapshot with surrounding whitespace trimmed. A stream without snapshots
    /// closes with no chunk and an empty answer.
    pub fn finish(self) -> (Option<WordChunk>, String) {
        let spans = token_spans(&self.latest);
        let closing = (self.committed < spans.len())
            .then(|| cut_chunk(&self.latest, &spans, self.committed, spans.len()));
        (closing, self.latest.trim().to_string())
    }
}

/// Byte ranges of the whitespace-delimited tokens in `text`
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;

    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Chunk covering tokens `[from, to)`, with the raw whitespace that preceded
/// token `from` as its separator. The first token of a stream has none.
fn cut_chunk(text: &str, spans: &[(usize, usize)], from: usize, to: usize) -> WordChunk {
    let words_start = spans[from].0;
    let separator_start = if from == 0 { words_start } else { spans[from - 1].1 };

    WordChunk {
        separator: text[separator_start..words_start].to_string(),
        text: text[words_start..spans[to - 1].1].to_string(),
        words: to - from,
    }
}
