//! Local Input Sources
//!
//! Both sources are blocking from the caller's point of view, and both give
//! way to Ctrl-C.

mod rich;
mod stdin;

pub use rich::{CommandHints, RichInput};
pub use stdin::{LineEvent, StdinLines};
