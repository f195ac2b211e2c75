//! Generation Stream Types
//!
//! The generation engine emits *cumulative* snapshots: every snapshot carries
//! the whole answer produced so far, not a delta. Console output, on the other
//! hand, is append-only. This module bridges the two.
//!
//! ```text
//!  snapshots:  "Hello"   "Hello there"   "Hello there friend"   <end>
//!                 │            │                  │               │
//!              (held)      "Hello"            "there"         "friend"
//!                 └────────────┴─── SnapshotDiffer ─┴──────────────┘
//! ```
//!
//! The last word of a snapshot may still be growing ("fri" → "friend"), so the
//! differ always holds it back until a later snapshot or the end of the stream
//! proves it complete.

mod differ;

pub use differ::SnapshotDiffer;

/// One cumulative emission from the generation engine
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationSnapshot {
    /// Entire accumulated output so far
    pub text: String,
}

impl GenerationSnapshot {
    /// Create a snapshot from accumulated text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for GenerationSnapshot {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for GenerationSnapshot {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// A group of words confirmed complete since the previous chunk
///
/// Chunks are final: once produced they are never revised. Writing every
/// chunk's `separator` then `text` reproduces the snapshot text, line breaks
/// included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordChunk {
    /// Whitespace between the previous chunk and this one
    pub separator: String,
    /// The words, with the whitespace between them as generated
    pub text: String,
    /// Number of words in this chunk
    pub words: usize,
}
