//! Console Errors

use std::io;
use std::path::PathBuf;

use parlor_core::TransportError;
use thiserror::Error;

/// Errors surfaced to the chat loop
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Writing to the terminal or reading local input failed
    #[error("Console IO error: {0}")]
    Io(#[from] io::Error),

    /// The Transport Session failed; the turn cannot continue
    #[error("Remote input failed: {0}")]
    Transport(#[from] TransportError),

    /// The operator pressed Ctrl-C
    #[error("Interrupted")]
    Interrupted,

    /// The line editor could not read input
    #[error("Input error: {0}")]
    Input(String),

    /// The fixed input file could not be read
    #[error("Failed to read input file {path:?}: {source}")]
    InputFile {
        /// Configured file path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

impl ConsoleError {
    /// Whether this error is an operator interrupt rather than a failure
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::Interrupted | Self::Transport(TransportError::Interrupted)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_interrupt() {
        assert!(ConsoleError::Interrupted.is_interrupt());
        assert!(ConsoleError::from(TransportError::Interrupted).is_interrupt());
        assert!(!ConsoleError::from(TransportError::ConnectionClosed).is_interrupt());
        assert!(!ConsoleError::Input("bad".into()).is_interrupt());
    }
}
