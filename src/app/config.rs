//! Configuration for the inspector
//!
//! Settings are resolved with the precedence
//! CLI args > environment variables > config file > defaults.
//! The config file is JSON, by default `~/.config/ansi-tools/config.json`.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::parser::Mode;

/// CLI arguments for the inspector
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ansi-inspect")]
#[command(version)]
#[command(about = "Decode ANSI escape sequences and replay them on a virtual terminal", long_about = None)]
pub struct CliArgs {
    /// Input file (reads stdin if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input mode (auto, raw, literal)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<ModeSetting>,

    /// Output format (codes, tokens, json, render, snapshot)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Stop after this many records
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print the frames captured before each erase (render format)
    #[arg(long)]
    pub frames: bool,

    /// Show literal-mode text as written instead of decoded
    #[arg(long)]
    pub no_decode: bool,
}

/// Input mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    /// Detect from the input
    #[default]
    Auto,
    Raw,
    Literal,
}

impl ModeSetting {
    /// Mode to use for `input`
    pub fn resolve(self, input: &str) -> Mode {
        match self {
            ModeSetting::Auto => Mode::detect(input),
            ModeSetting::Raw => Mode::Raw,
            ModeSetting::Literal => Mode::Literal,
        }
    }
}

impl FromStr for ModeSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(ModeSetting::Auto);
        }
        Ok(match s.parse::<Mode>()? {
            Mode::Raw => ModeSetting::Raw,
            Mode::Literal => ModeSetting::Literal,
        })
    }
}

/// Output format of the inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per control code
    #[default]
    Codes,
    /// One line per token
    Tokens,
    /// Control codes as a JSON array
    Json,
    /// Final buffer text
    Render,
    /// Buffer snapshot as JSON
    Snapshot,
}

impl OutputFormat {
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Codes => "codes",
            OutputFormat::Tokens => "tokens",
            OutputFormat::Json => "json",
            OutputFormat::Render => "render",
            OutputFormat::Snapshot => "snapshot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "codes" => Ok(OutputFormat::Codes),
            "tokens" => Ok(OutputFormat::Tokens),
            "json" => Ok(OutputFormat::Json),
            "render" => Ok(OutputFormat::Render),
            "snapshot" => Ok(OutputFormat::Snapshot),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inspector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input mode
    pub mode: ModeSetting,
    /// Output format
    pub format: OutputFormat,
    /// Show the decoded form of literal-mode text
    pub decode_text: bool,
    /// Maximum number of records to output
    pub limit: Option<usize>,
    /// Include captured frames in render output
    pub show_frames: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeSetting::Auto,
            format: OutputFormat::Codes,
            decode_text: true,
            limit: None,
            show_frames: false,
        }
    }
}

impl Config {
    /// Load configuration with full precedence:
    /// CLI args > environment variables > config file > defaults
    ///
    /// An explicitly given config file must load; a missing or broken default
    /// one is skipped with a warning.
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::load_or_default(),
        };

        config.apply_env_vars();
        config.apply_cli_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config from {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("ansi-tools")
                .join("config.json")
        })
    }

    /// Apply environment variables to config
    fn apply_env_vars(&mut self) {
        if let Ok(val) = env::var("ANSI_TOOLS_MODE") {
            match val.parse::<ModeSetting>() {
                Ok(mode) => self.mode = mode,
                Err(e) => tracing::warn!("Ignoring ANSI_TOOLS_MODE: {}", e),
            }
        }
        if let Ok(val) = env::var("ANSI_TOOLS_FORMAT") {
            match val.parse::<OutputFormat>() {
                Ok(format) => self.format = format,
                Err(e) => tracing::warn!("Ignoring ANSI_TOOLS_FORMAT: {}", e),
            }
        }
    }

    /// Apply CLI arguments to config
    fn apply_cli_args(&mut self, args: &CliArgs) {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(format) = args.format {
            self.format = format;
        }
        if let Some(limit) = args.limit {
            self.limit = Some(limit);
        }
        if args.frames {
            self.show_frames = true;
        }
        if args.no_decode {
            self.decode_text = false;
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == Some(0) {
            return Err(ConfigError::Invalid {
                field: "limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error in '{field}': {message}")]
    Invalid { field: String, message: String },
}
