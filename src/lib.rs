//! ANSI Tools Library
//!
//! Decodes terminal control-sequence text into typed records and replays
//! them on a virtual terminal buffer.
//!
//! - `parser`: tokenizer and sequence parser, for raw bytes or backslash-escaped text
//! - `core`: virtual terminal buffer with cursor, erase and frame history
//! - `input`: byte decoding for terminal captures
//! - `app`: configuration for the `ansi-inspect` runner
//!
//! ```
//! use ansi_tools::{parse, render, Mode};
//!
//! let codes = parse("\x1b[1mbold\x1b[0m", Mode::Raw);
//! assert_eq!(codes[0].command(), Some("m"));
//!
//! let snapshot = render("AB\x1b[2JC", Mode::Raw);
//! assert_eq!(snapshot.frames, ["AB"]);
//! assert_eq!(snapshot.lines, ["C"]);
//! ```

pub mod app;
pub mod core;
pub mod error;
pub mod input;
pub mod parser;

pub use crate::core::{render, RenderStream, Snapshot, VirtualTerminalBuffer};
pub use error::{Error, Result};
pub use parser::{
    parse, parser, plain_text, tokenize, tokenizer, CodeType, ControlCode, Mode, Parser,
    Sequence, SequenceClass, Text, Token, TokenKind, Tokenizer,
};
