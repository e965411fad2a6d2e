//! CLI argument definitions for the Glimpse binary.
//!
//! Uses `clap` with derive macros for argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Glimpse: read a name and date of birth off an ID card image.
#[derive(Parser, Debug)]
#[command(name = "glimpse", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// OCR language code, e.g. `eng`.
    #[arg(long = "language", global = true)]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Recognize one image and print the extracted data.
    Convert {
        /// Image URL or local path.
        image: String,
    },
    /// Copy the demo image URL to the clipboard.
    DemoLink,
    /// Interactive session (default).
    Shell,
}

impl CliArgs {
    /// The subcommand to run; `shell` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > GLIMPSE_CONFIG env var > ~/.glimpse/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("GLIMPSE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value > "info".
    /// `RUST_LOG` still overrides the result when the subscriber is built.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if !config_level.trim().is_empty() {
            return config_level.to_string();
        }
        "info".to_string()
    }

    /// Resolve the OCR language.
    ///
    /// Priority: --language flag > config file value.
    pub fn resolve_language(&self, config_language: &str) -> String {
        self.language
            .clone()
            .unwrap_or_else(|| config_language.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".glimpse").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".glimpse").join("config.toml");
    }
    PathBuf::from("config.toml")
}
