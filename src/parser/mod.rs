//! ANSI/VT escape sequence parser
//!
//! Two stages, both lazy:
//!
//! - [`Tokenizer`]: text into TEXT/INTRODUCER/DATA/FINAL/CANCEL tokens
//! - [`Parser`]: tokens into [`ControlCode`]s, one per text run or sequence
//!
//! Input is either raw (real control bytes) or literal (backslash escapes
//! such as `\x1b[31m`), see [`Mode`].
//!
//! Reference: https://invisible-island.net/xterm/ctlseqs/ctlseqs.html

mod assembler;
mod code;
pub mod params;
mod sequence;
pub mod syntax;
mod token;
mod tokenizer;
mod unescape;

pub use assembler::Parser;
pub use code::{plain_text, CodeType, ControlCode, Sequence, Text};
pub use params::OMITTED;
pub use syntax::Mode;
pub use token::{SequenceClass, Token, TokenKind};
pub use tokenizer::Tokenizer;
pub use unescape::unescape;

/// Lazily tokenize `input`
pub fn tokenizer(input: &str, mode: Mode) -> Tokenizer<'_> {
    Tokenizer::new(input, mode)
}

/// Tokenize all of `input`
pub fn tokenize(input: &str, mode: Mode) -> Vec<Token<'_>> {
    tokenizer(input, mode).collect()
}

/// Lazily parse `input` into control codes
pub fn parser(input: &str, mode: Mode) -> Parser<Tokenizer<'_>> {
    Parser::with_mode(tokenizer(input, mode), mode)
}

/// Parse all of `input` into control codes
pub fn parse(input: &str, mode: Mode) -> Vec<ControlCode> {
    parser(input, mode).collect()
}
