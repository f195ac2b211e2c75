//! Echo Generator
//!
//! Stand-in for a model: replays the operator's last message one word at a
//! time, as growing snapshots with the original spacing kept.

use std::thread;
use std::time::Duration;

use parlor_core::GenerationSnapshot;

use crate::chat_loop::{Conversation, Generator};

/// Generator that streams the last message back
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator {
    word_delay: Duration,
}

impl EchoGenerator {
    /// Create a generator pausing `word_delay` between words
    pub fn new(word_delay: Duration) -> Self {
        Self { word_delay }
    }
}

impl Generator for EchoGenerator {
    fn generate(
        &mut self,
        conversation: &Conversation,
    ) -> Box<dyn Iterator<Item = GenerationSnapshot> + '_> {
        let source = conversation.last_text().unwrap_or_default().to_string();
        Box::new(EchoStream::new(source, self.word_delay))
    }
}

struct EchoStream {
    source: String,
    word_ends: Vec<usize>,
    next: usize,
    delay: Duration,
}

impl EchoStream {
    fn new(source: String, delay: Duration) -> Self {
        let word_ends = word_ends(&source);
        Self {
            source,
            word_ends,
            next: 0,
            delay,
        }
    }
}

impl Iterator for EchoStream {
    type Item = GenerationSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let end = *self.word_ends.get(self.next)?;
        if self.next > 0 && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.next += 1;
        Some(GenerationSnapshot::new(&self.source[..end]))
    }
}

/// Byte offsets just past each whitespace-separated word
fn word_ends(text: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                ends.push(i);
            }
            in_word = false;
        } else {
            in_word = true;
        }
    }
    if in_word {
        ends.push(text.len());
    }
    ends
}
