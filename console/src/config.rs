//! Console Configuration
//!
//! Values are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `<config dir>/parlor/config.toml` if present)
//! 3. `PARLOR_*` environment variables
//! 4. Command-line flags (applied by the binary)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use parlor_core::TransportConfig;
use serde::{Deserialize, Serialize};

use crate::chat_loop::Roles;

/// Which console variant to run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStyle {
    /// Local stdin and append-only output
    #[default]
    Simple,
    /// Input from a remote operator over WebSocket
    Remote,
    /// Line editor input and live markdown output
    Rich,
    /// Input read from a file on every turn
    Programmatic,
}

/// Console configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub style: ConsoleStyle,
    /// Collect several lines per message
    pub multiline: bool,
    /// Input file for the programmatic style, relative to the working directory
    pub input_file: PathBuf,
    /// Live markdown redraws per second
    pub refresh_per_second: u32,
    pub user_role: String,
    pub assistant_role: String,
    /// Line editor history entries kept for the session
    pub history_size: usize,
    /// Delay between words of the built-in echo generator
    pub echo_delay_ms: u64,
    pub transport: TransportConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            style: ConsoleStyle::default(),
            multiline: false,
            input_file: PathBuf::from("inputs/input_prompt.txt"),
            refresh_per_second: 4,
            user_role: "USER".to_string(),
            assistant_role: "ASSISTANT".to_string(),
            history_size: 100,
            echo_delay_ms: 0,
            transport: TransportConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load defaults, then the config file, then the environment
    ///
    /// An explicit `path` must exist. The default location is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(base.overlay_env())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = ?path, "Loaded config file");
        Ok(config)
    }

    /// Apply `PARLOR_*` environment overrides
    ///
    /// Unparseable values are ignored with a warning.
    pub fn overlay_env(self) -> Self {
        Self {
            style: env_parsed("PARLOR_STYLE", |v| ConsoleStyle::from_str(v, true).ok())
                .unwrap_or(self.style),
            multiline: env_parsed("PARLOR_MULTILINE", parse_flag).unwrap_or(self.multiline),
            input_file: std::env::var_os("PARLOR_INPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or(self.input_file),
            refresh_per_second: env_parsed("PARLOR_REFRESH_PER_SECOND", |v| v.parse().ok())
                .unwrap_or(self.refresh_per_second),
            user_role: std::env::var("PARLOR_USER_ROLE").unwrap_or(self.user_role),
            assistant_role: std::env::var("PARLOR_ASSISTANT_ROLE").unwrap_or(self.assistant_role),
            history_size: env_parsed("PARLOR_HISTORY_SIZE", |v| v.parse().ok())
                .unwrap_or(self.history_size),
            echo_delay_ms: env_parsed("PARLOR_ECHO_DELAY_MS", |v| v.parse().ok())
                .unwrap_or(self.echo_delay_ms),
            transport: self.transport.overlay_env(),
        }
    }

    /// Minimum time between live markdown redraws
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_per_second.max(1)
    }

    pub fn roles(&self) -> Roles {
        Roles {
            user: self.user_role.clone(),
            assistant: self.assistant_role.clone(),
        }
    }
}

/// `<config dir>/parlor/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parlor").join("config.toml"))
}

fn env_parsed<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "Ignoring invalid environment override");
    }
    parsed
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
