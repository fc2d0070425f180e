//! Application glue module
//!
//! Configuration for the command-line inspector.

mod config;

pub use config::{CliArgs, Config, ConfigError, ModeSetting, OutputFormat};
