//! Token to control code assembly
//!
//! Groups INTRODUCER, DATA* and an optional FINAL into one sequence and
//! hands the pieces to the per-class parsers. TEXT tokens pass through.

use std::iter::Peekable;

use super::code::{ControlCode, Text};
use super::sequence::{parse_sequence, Parts};
use super::syntax::Mode;
use super::token::{SequenceClass, Token, TokenKind};
use super::unescape::unescape;

/// Lazy parser over a token stream
pub struct Parser<I: Iterator> {
    tokens: Peekable<I>,
    mode: Mode,
}

impl<'a, I> Parser<I>
where
    I: Iterator<Item = Token<'a>>,
{
    /// Create a parser over raw-mode tokens
    pub fn new(tokens: I) -> Self {
        Self::with_mode(tokens, Mode::Raw)
    }

    /// Create a parser over tokens of the given mode
    ///
    /// In literal mode TEXT codes also carry their decoded form.
    pub fn with_mode(tokens: I, mode: Mode) -> Self {
        Self {
            tokens: tokens.peekable(),
            mode,
        }
    }

    fn text(&self, token: Token<'a>) -> ControlCode {
        let mut text = Text::new(token.position, token.raw);
        if self.mode == Mode::Literal {
            text.plain = Some(unescape(token.raw));
        }
        ControlCode::Text(text)
    }

    fn sequence(&mut self, introducer: Token<'a>) -> ControlCode {
        let mut data = String::new();
        while let Some(token) = self.tokens.next_if(|token| token.kind == TokenKind::Data) {
            data.push_str(token.raw);
        }

        // A CANCEL ends the sequence too, but is not part of it
        let final_ = self
            .tokens
            .next_if(|token| matches!(token.kind, TokenKind::Final | TokenKind::Cancel))
            .filter(|token| token.kind == TokenKind::Final)
            .map(|token| token.raw);

        let mut raw = String::with_capacity(introducer.raw.len() + data.len() + 2);
        raw.push_str(introducer.raw);
        raw.push_str(&data);
        raw.push_str(final_.unwrap_or_default());

        let parts = Parts {
            position: introducer.position,
            class: introducer.class.unwrap_or(SequenceClass::Esc),
            intermediate: introducer.intermediate,
            data: &data,
            final_,
        };
        parse_sequence(parts, raw)
    }
}

impl<'a, I> Iterator for Parser<I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = ControlCode;

    fn next(&mut self) -> Option<ControlCode> {
        loop {
            let token = self.tokens.next()?;
            match token.kind {
                TokenKind::Text => return Some(self.text(token)),
                TokenKind::Introducer => return Some(self.sequence(token)),
                TokenKind::Data | TokenKind::Final | TokenKind::Cancel => {
                    tracing::debug!("Skipping stray {:?} token at {}", token.kind, token.position);
                }
            }
        }
    }
}
