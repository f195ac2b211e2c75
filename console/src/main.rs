//! Parlor - interactive console for streaming text generation
//!
//! # Usage
//!
//! ```bash
//! # Local stdin, plain output
//! parlor
//!
//! # Markdown output with a line editor
//! parlor --style rich
//!
//! # Take operator input from a WebSocket peer
//! parlor --style remote --endpoint ws://127.0.0.1:8080/ws --multiline
//!
//! # Re-read a prompt file every turn
//! parlor --style programmatic --input-file inputs/input_prompt.txt
//!
//! # Verbose logging (to stderr)
//! RUST_LOG=debug parlor
//! ```
//!
//! Type `!!exit` (or an empty message) to quit and `!!reset` to start over.
//! Ctrl-C ends the session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use parlor_console::{chat_io, chat_loop, ConsoleConfig, ConsoleStyle, EchoGenerator};
use parlor_core::InterruptSignal;
use tracing::info;

/// Parlor - interactive console for streaming text generation
#[derive(Parser, Debug)]
#[command(name = "parlor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Console style
    #[arg(short = 's', long, value_enum)]
    style: Option<ConsoleStyle>,

    /// Collect several lines per message
    #[arg(short = 'm', long)]
    multiline: bool,

    /// Configuration file path
    #[arg(short = 'c', long, env = "PARLOR_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// WebSocket endpoint for the remote style
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Input file for the programmatic style
    #[arg(long, value_name = "PATH")]
    input_file: Option<PathBuf>,

    /// Live markdown redraws per second (rich style)
    #[arg(long)]
    refresh_per_second: Option<u32>,

    /// Delay between echoed words, in milliseconds
    #[arg(long)]
    echo_delay_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "PARLOR_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config
    fn apply(self, mut config: ConsoleConfig) -> ConsoleConfig {
        if let Some(style) = self.style {
            config.style = style;
        }
        if self.multiline {
            config.multiline = true;
        }
        if let Some(endpoint) = self.endpoint {
            config.transport.endpoint = endpoint;
        }
        if let Some(input_file) = self.input_file {
            config.input_file = input_file;
        }
        if let Some(rate) = self.refresh_per_second {
            config.refresh_per_second = rate;
        }
        if let Some(delay) = self.echo_delay_ms {
            config.echo_delay_ms = delay;
        }
        config
    }
}

/// Initialize logging with the specified level
///
/// Logs go to stderr so they never mix with the conversation on stdout.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("parlor_console={level},parlor_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("Parlor starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ConsoleConfig::load(args.config.as_deref())?;
    let config = args.apply(config);

    let interrupt = InterruptSignal::install().context("Failed to install Ctrl-C handler")?;
    let mut io = chat_io::build(&config, &interrupt)?;
    let mut generator = EchoGenerator::new(Duration::from_millis(config.echo_delay_ms));

    match chat_loop::run(io.as_mut(), &mut generator, &config.roles()) {
        Ok(_) => {
            info!("Parlor exiting");
            Ok(())
        }
        Err(e) if e.is_interrupt() => {
            println!("exit...");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
