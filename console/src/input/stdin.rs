//! Line-at-a-time stdin reader
//!
//! A reader thread owns stdin and hands complete lines over a rendezvous
//! channel, so a prompt can wait on input and Ctrl-C at the same time.

use std::io::{self, BufRead, BufReader, IsTerminal};
use std::thread;

use crossbeam_channel::{bounded, select, Receiver, Sender};
use parlor_core::InterruptSignal;

use crate::error::ConsoleError;

/// One read from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A line without its terminator
    Line(String),
    /// End of input (Ctrl-D / Ctrl-Z, or a closed pipe)
    Eof,
}

/// Stdin lines delivered through a background reader thread
pub struct StdinLines {
    rx: Receiver<io::Result<LineEvent>>,
}

impl StdinLines {
    /// Start reading process stdin
    ///
    /// On a terminal, reading resumes after end-of-input so the next prompt
    /// can read again. On a pipe, the first end-of-input is final.
    pub fn spawn() -> io::Result<Self> {
        let resume_after_eof = io::stdin().is_terminal();
        Self::from_reader(BufReader::new(io::stdin()), resume_after_eof)
    }

    /// Start reading from any buffered reader
    pub fn from_reader<R>(reader: R, resume_after_eof: bool) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = bounded(0);
        thread::Builder::new()
            .name("parlor-stdin".to_string())
            .spawn(move || pump(reader, &tx, resume_after_eof))?;
        Ok(Self { rx })
    }

    /// Block until the next line, end of input, or an interrupt
    pub fn next_line(&self, interrupt: &InterruptSignal) -> Result<LineEvent, ConsoleError> {
        if interrupt.is_raised() {
            return Err(ConsoleError::Interrupted);
        }
        select! {
            recv(self.rx) -> event => match event {
                Ok(Ok(event)) => Ok(event),
                Ok(Err(e)) => Err(ConsoleError::Io(e)),
                Err(_) => Ok(LineEvent::Eof),
            },
            recv(interrupt.receiver()) -> _ => Err(ConsoleError::Interrupted),
        }
    }
}

fn pump<R: BufRead>(mut reader: R, tx: &Sender<io::Result<LineEvent>>, resume_after_eof: bool) {
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                if tx.send(Ok(LineEvent::Eof)).is_err() || !resume_after_eof {
                    break;
                }
            }
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                if tx.send(Ok(LineEvent::Line(line))).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Stdin read failed");
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
    tracing::debug!("Stdin reader stopped");
}
