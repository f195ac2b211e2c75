//! Output Renderers
//!
//! - [`PlainRenderer`]: append-only word chunks, driven by the snapshot differ
//! - [`MarkdownLiveRenderer`]: whole-buffer markdown, redrawn in place

mod markdown;
mod plain;

pub use markdown::{normalize_line_breaks, render_markdown, MarkdownLiveRenderer};
pub use plain::PlainRenderer;
