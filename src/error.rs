//! Error types
//!
//! Malformed terminal input is never an error; it parses into best-effort
//! control codes. Errors are reserved for caller mistakes and I/O.

use std::io;

use thiserror::Error;

use crate::app::ConfigError;

/// Crate error type
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown input mode name
    #[error("Invalid input mode '{0}' (expected raw or literal)")]
    InvalidMode(String),

    /// Unknown output format name
    #[error("Invalid output format '{0}' (expected codes, tokens, json, render or snapshot)")]
    InvalidFormat(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;
