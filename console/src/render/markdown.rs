//! Markdown Live Renderer
//!
//! Re-renders the whole accumulated answer as markdown and repaints it in a
//! live region at the bottom of the terminal.
//!
//! # Architecture
//!
//! ```text
//! snapshot ──► normalize_line_breaks ──► termimad FmtText ──► LiveRegion
//!                                                               │
//!                              MoveUp(n) + Clear(FromCursorDown) ┘
//! ```
//!
//! Redraws are throttled to the configured refresh rate. The first snapshot
//! is drawn immediately and the final state is always drawn, so the stream
//! never ends on a stale frame.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::queue;
use crossterm::terminal::{self, Clear, ClearType};
use parlor_core::{GenerationSnapshot, InterruptSignal};
use termimad::{FmtText, MadSkin};

use crate::error::ConsoleError;

const FENCE_MARKER: &str = "```";
const HARD_BREAK: &str = "  ";
const FALLBACK_WIDTH: usize = 80;

/// Make every newline outside code fences a hard line break
///
/// Plain markdown folds single newlines into spaces; model output expects
/// them to be kept. Fence marker lines, lines inside a fence, and blank lines
/// pass through unchanged. A marker only counts at the start of a line. Applying the transform twice gives the same text.
pub fn normalize_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut in_fence = false;

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.starts_with(FENCE_MARKER) {
            in_fence = !in_fence;
            out.push_str(line);
        } else if in_fence || line.trim().is_empty() {
            out.push_str(line);
        } else {
            out.push_str(line.trim_end());
            out.push_str(HARD_BREAK);
        }
    }

    out
}

/// Render raw model text as terminal markdown at `width` columns
///
/// Falls back to the raw text if formatting fails. The result always ends
/// with a newline.
pub fn render_markdown(skin: &MadSkin, raw: &str, width: usize) -> String {
    let markdown = normalize_line_breaks(raw);
    let text = FmtText::from(skin, &markdown, Some(width));

    let mut rendered = String::new();
    if let Err(e) = write!(rendered, "{text}") {
        tracing::debug!(error = %e, "Markdown formatting failed, showing raw text");
        rendered = raw.to_string();
    }
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

/// Live markdown renderer over any output sink
pub struct MarkdownLiveRenderer<W: Write> {
    sink: W,
    skin: MadSkin,
    refresh_interval: Duration,
    width: Option<usize>,
}

impl<W: Write> MarkdownLiveRenderer<W> {
    /// Create a renderer that repaints at most once per `refresh_interval`
    pub fn new(sink: W, refresh_interval: Duration) -> Self {
        Self {
            sink,
            skin: MadSkin::default(),
            refresh_interval,
            width: None,
        }
    }

    /// Fix the render width instead of querying the terminal
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Drain a snapshot stream into the live region
    ///
    /// Returns the raw text of the last snapshot. On interrupt the region is
    /// released where it stands and the cursor restored.
    pub fn render_loop(
        &mut self,
        snapshots: &mut dyn Iterator<Item = GenerationSnapshot>,
        interrupt: &InterruptSignal,
    ) -> Result<String, ConsoleError> {
        let width = self.width.unwrap_or_else(terminal_width);
        let mut region = LiveRegion::new(&mut self.sink, &self.skin, width, self.refresh_interval);
        let mut latest = String::new();

        for snapshot in snapshots {
            if interrupt.is_raised() {
                return Err(ConsoleError::Interrupted);
            }
            latest = snapshot.text;
            region.offer(&latest)?;
        }
        if interrupt.is_raised() {
            return Err(ConsoleError::Interrupted);
        }

        tracing::debug!(redraws = region.redraws, "Live region finished");
        region.finish(&latest)?;
        Ok(latest)
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

fn terminal_width() -> usize {
    terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(FALLBACK_WIDTH)
}

/// Screen area owned by one streaming answer
///
/// Overwrites its previous frame on each draw. Content taller than the
/// terminal scrolls, and lines that scroll off cannot be cleared.
struct LiveRegion<'a, W: Write> {
    sink: &'a mut W,
    skin: &'a MadSkin,
    width: usize,
    refresh_interval: Duration,
    drawn_lines: usize,
    last_draw: Option<Instant>,
    dirty: bool,
    cursor_hidden: bool,
    redraws: usize,
}

impl<'a, W: Write> LiveRegion<'a, W> {
    fn new(sink: &'a mut W, skin: &'a MadSkin, width: usize, refresh_interval: Duration) -> Self {
        Self {
            sink,
            skin,
            width,
            refresh_interval,
            drawn_lines: 0,
            last_draw: None,
            dirty: false,
            cursor_hidden: false,
            redraws: 0,
        }
    }

    /// Draw now if the refresh interval has passed, otherwise defer
    fn offer(&mut self, raw: &str) -> io::Result<()> {
        let due = self
            .last_draw
            .map_or(true, |at| at.elapsed() >= self.refresh_interval);
        if due {
            self.draw(raw)
        } else {
            self.dirty = true;
            Ok(())
        }
    }

    fn finish(&mut self, raw: &str) -> io::Result<()> {
        if self.dirty {
            self.draw(raw)?;
        }
        self.release()?;
        writeln!(self.sink)?;
        self.sink.flush()
    }

    fn draw(&mut self, raw: &str) -> io::Result<()> {
        let rendered = render_markdown(self.skin, raw, self.width);

        if !self.cursor_hidden {
            queue!(self.sink, Hide)?;
            self.cursor_hidden = true;
        }
        queue!(self.sink, MoveToColumn(0))?;
        if self.drawn_lines > 0 {
            let up = u16::try_from(self.drawn_lines).unwrap_or(u16::MAX);
            queue!(self.sink, MoveUp(up))?;
        }
        queue!(self.sink, Clear(ClearType::FromCursorDown))?;
        self.sink.write_all(rendered.as_bytes())?;
        self.sink.flush()?;

        self.drawn_lines = rendered.matches('\n').count();
        self.last_draw = Some(Instant::now());
        self.dirty = false;
        self.redraws += 1;
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        if self.cursor_hidden {
            queue!(self.sink, Show)?;
            self.cursor_hidden = false;
            self.sink.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for LiveRegion<'_, W> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CLEAR_DOWN: &str = "\x1b[J";

    fn output(renderer: MarkdownLiveRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(&renderer.into_inner()).into_owned()
    }

    // ========================================================================
    // Line break transform
    // ========================================================================

    #[test]
    fn test_plain_lines_get_hard_breaks() {
        assert_eq!(normalize_line_breaks("one\ntwo"), "one  \ntwo  ");
    }

    #[test]
    fn test_blank_lines_stay_blank() {
        assert_eq!(normalize_line_breaks("one\n\ntwo"), "one  \n\ntwo  ");
    }

    #[test]
    fn test_fenced_code_untouched() {
        let text = "intro\n```rust\nlet x = 1;\nlet y = 2;\n```\noutro";
        assert_eq!(
            normalize_line_breaks(text),
            "intro  \n```rust\nlet x = 1;\nlet y = 2;\n```\noutro  "
        );
    }

    #[test]
    fn test_indented_backticks_are_not_a_fence() {
        let text = "Use\n  ```\nlike this\nok";
        assert_eq!(
            normalize_line_breaks(text),
            "Use  \n  ```  \nlike this  \nok  "
        );
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let text = "```\ncode\nmore code";
        assert_eq!(normalize_line_breaks(text), text);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let samples = [
            "",
            "single",
            "trailing   \nspaces",
            "a\n\n\nb\n",
            "x\n```\ny  \n```\nz",
            "   indented\n\tTabbed",
            "a\n  ```\nb",
        ];
        for sample in samples {
            let once = normalize_line_breaks(sample);
            assert_eq!(normalize_line_breaks(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn test_render_markdown_ends_with_newline() {
        let rendered = render_markdown(&MadSkin::default(), "hello", 40);
        assert!(rendered.contains("hello"));
        assert!(rendered.ends_with('\n'));

        assert!(render_markdown(&MadSkin::default(), "", 40).ends_with('\n'));
    }

    // ========================================================================
    // Live region
    // ========================================================================

    #[test]
    fn test_render_loop_returns_raw_text() {
        let mut renderer =
            MarkdownLiveRenderer::new(Vec::new(), Duration::ZERO).with_width(40);
        let mut stream = ["Hello", "Hello there", "Hello there friend"]
            .into_iter()
            .map(GenerationSnapshot::from);

        let full = renderer
            .render_loop(&mut stream, &InterruptSignal::new())
            .unwrap();

        assert_eq!(full, "Hello there friend");
        let out = output(renderer);
        assert!(out.contains("friend"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_redraws_are_throttled() {
        let mut renderer =
            MarkdownLiveRenderer::new(Vec::new(), Duration::from_secs(60)).with_width(40);
        let mut stream = ["one", "one two", "one two three", "one two three four"]
            .into_iter()
            .map(GenerationSnapshot::from);

        renderer
            .render_loop(&mut stream, &InterruptSignal::new())
            .unwrap();

        // First snapshot immediately, final state once at the end
        let out = output(renderer);
        assert_eq!(out.matches(CLEAR_DOWN).count(), 2);
        assert!(out.contains("four"));
    }

    #[test]
    fn test_every_snapshot_drawn_without_throttle() {
        let mut renderer =
            MarkdownLiveRenderer::new(Vec::new(), Duration::ZERO).with_width(40);
        let mut stream = ["a", "a b", "a b c"].into_iter().map(GenerationSnapshot::from);

        renderer
            .render_loop(&mut stream, &InterruptSignal::new())
            .unwrap();

        assert_eq!(output(renderer).matches(CLEAR_DOWN).count(), 3);
    }

    #[test]
    fn test_empty_stream_prints_separator_only() {
        let mut renderer =
            MarkdownLiveRenderer::new(Vec::new(), Duration::ZERO).with_width(40);
        let mut stream = std::iter::empty();

        let full = renderer
            .render_loop(&mut stream, &InterruptSignal::new())
            .unwrap();

        assert_eq!(full, "");
        assert_eq!(output(renderer), "\n");
    }

    #[test]
    fn test_interrupt_restores_cursor() {
        let interrupt = InterruptSignal::new();
        let trigger = interrupt.clone();
        let mut stream = ["first", "second"].into_iter().enumerate().map(move |(i, t)| {
            if i == 1 {
                trigger.trigger();
            }
            GenerationSnapshot::from(t)
        });

        let mut renderer =
            MarkdownLiveRenderer::new(Vec::new(), Duration::ZERO).with_width(40);
        let result = renderer.render_loop(&mut stream, &interrupt);

        assert!(matches!(result, Err(ConsoleError::Interrupted)));
        let out = output(renderer);
        // Hide then Show
        assert!(out.contains("\x1b[?25l"));
        assert!(out.ends_with("\x1b[?25h"));
        assert!(!out.contains("second"));
    }
}
