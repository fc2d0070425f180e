//! Lexical state machine
//!
//! Splits input into TEXT, INTRODUCER, DATA, FINAL and CANCEL tokens. The
//! machine has two states:
//!
//! - Ground: plain text up to the next introducer
//! - Sequence: payload of a sequence of a known class, up to its final
//!   byte, terminator or interrupter
//!
//! Tokens are produced lazily, one per call to `next`, so callers can stop
//! pulling at any point. Every byte of the input ends up in exactly one
//! token.

use std::iter::FusedIterator;

use super::syntax::{Lead, Mode, Syntax};
use super::token::{SequenceClass, Token};

/// Tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Sequence(SequenceClass),
}

/// Where a sequence payload stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// CAN/SUB of the given length, consumed
    Cancel(usize),
    /// Final byte or string terminator of the given length
    Final(usize),
    /// A new introducer, left for the ground state
    Interrupt,
}

/// Lazy tokenizer over a borrowed input
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    state: State,
    mode: Mode,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer for `input` spelled in `mode`
    pub fn new(input: &'a str, mode: Mode) -> Self {
        Self {
            input,
            pos: 0,
            state: State::Ground,
            mode,
        }
    }

    /// Input mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Input being tokenized
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset of the next token
    pub fn position(&self) -> usize {
        self.pos
    }

    fn syntax(&self) -> &'static dyn Syntax {
        self.mode.syntax()
    }

    fn char_at(&self, at: usize) -> Option<char> {
        self.input.get(at..)?.chars().next()
    }

    fn ground(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        if start >= self.input.len() {
            return None;
        }

        if let Some(lead) = self.syntax().lead(self.input, start) {
            return Some(self.introducer(start, lead));
        }

        let end = self
            .syntax()
            .find_lead(self.input, start)
            .unwrap_or(self.input.len());
        self.pos = end;
        Some(Token::text(start, &self.input[start..end]))
    }

    fn introducer(&mut self, start: usize, lead: Lead) -> Token<'a> {
        let (class, end, intermediate) = match lead {
            Lead::Control(class, len) => (class, start + len, None),
            Lead::Escape(len) => {
                let after = start + len;
                match self.char_at(after).and_then(SequenceClass::from_opener) {
                    // Openers are all ASCII
                    Some(class) => (class, after + 1, None),
                    None => {
                        let end = self.intermediates_end(after);
                        let intermediate = (end > after).then(|| &self.input[after..end]);
                        (SequenceClass::Esc, end, intermediate)
                    }
                }
            }
        };

        self.pos = end;
        self.state = State::Sequence(class);
        Token::introducer(start, &self.input[start..end], class, intermediate)
    }

    /// End of the run of intermediate bytes (0x20-0x2F) starting at `at`
    fn intermediates_end(&self, at: usize) -> usize {
        self.input[at..]
            .char_indices()
            .find(|&(_, c)| !('\x20'..='\x2f').contains(&c))
            .map_or(self.input.len(), |(offset, _)| at + offset)
    }

    fn sequence(&mut self, class: SequenceClass) -> Option<Token<'a>> {
        let start = self.pos;
        let mut at = start;

        while let Some(c) = self.char_at(at) {
            let Some(stop) = self.stop_at(at, c, class) else {
                at += c.len_utf8();
                continue;
            };

            if at > start {
                // Flush the payload first; the stop is handled on the next call
                self.pos = at;
                return Some(Token::data(start, &self.input[start..at]));
            }

            self.state = State::Ground;
            return match stop {
                Stop::Cancel(len) => {
                    tracing::debug!("{} sequence cancelled at {}", class.name(), at);
                    self.pos = at + len;
                    Some(Token::cancel(at, &self.input[at..at + len]))
                }
                Stop::Final(len) => {
                    self.pos = at + len;
                    Some(Token::final_(at, &self.input[at..at + len]))
                }
                Stop::Interrupt => {
                    tracing::debug!("{} sequence interrupted at {}", class.name(), at);
                    self.ground()
                }
            };
        }

        self.state = State::Ground;
        tracing::debug!("{} sequence truncated at end of input", class.name());
        if at > start {
            self.pos = at;
            Some(Token::data(start, &self.input[start..at]))
        } else {
            None
        }
    }

    fn stop_at(&self, at: usize, c: char, class: SequenceClass) -> Option<Stop> {
        let syntax = self.syntax();

        if let Some(len) = syntax.cancel(self.input, at) {
            return Some(Stop::Cancel(len));
        }
        if class.is_string() {
            if let Some(len) = syntax.terminator(self.input, at, class) {
                return Some(Stop::Final(len));
            }
        }
        if syntax.lead(self.input, at).is_some() {
            return Some(Stop::Interrupt);
        }

        match class {
            SequenceClass::Csi if syntax.is_csi_final(c) => Some(Stop::Final(c.len_utf8())),
            SequenceClass::Esc => {
                let len = syntax
                    .escaped_backslash(self.input, at)
                    .unwrap_or(c.len_utf8());
                Some(Stop::Final(len))
            }
            _ => None,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let token = match self.state {
            State::Ground => self.ground(),
            State::Sequence(class) => self.sequence(class),
        }?;
        tracing::trace!("{:?} at {}: {:?}", token.kind, token.position, token.raw);
        Some(token)
    }
}

impl FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::TokenKind;

    fn kinds(input: &str, mode: Mode) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(input, mode)
            .map(|token| (token.kind, token.raw))
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("hello", Mode::Raw), vec![(TokenKind::Text, "hello")]);
        assert!(kinds("", Mode::Raw).is_empty());
    }

    #[test]
    fn test_csi() {
        assert_eq!(
            kinds("a\x1b[31mb", Mode::Raw),
            vec![
                (TokenKind::Text, "a"),
                (TokenKind::Introducer, "\x1b["),
                (TokenKind::Data, "31"),
                (TokenKind::Final, "m"),
                (TokenKind::Text, "b"),
            ]
        );
    }

    #[test]
    fn test_csi_without_params() {
        assert_eq!(
            kinds("\x1b[H", Mode::Raw),
            vec![(TokenKind::Introducer, "\x1b["), (TokenKind::Final, "H")]
        );
    }

    #[test]
    fn test_c1_introducer() {
        let tokens: Vec<_> = Tokenizer::new("\u{9b}2J", Mode::Raw).collect();
        assert_eq!(tokens[0].class, Some(SequenceClass::Csi));
        assert_eq!(tokens[0].raw, "\u{9b}");
        assert_eq!(tokens[1].raw, "2");
        assert_eq!(tokens[1].position, 2);
        assert_eq!(tokens[2].raw, "J");
    }

    #[test]
    fn test_osc_terminators() {
        assert_eq!(
            kinds("\x1b]0;title\x07", Mode::Raw),
            vec![
                (TokenKind::Introducer, "\x1b]"),
                (TokenKind::Data, "0;title"),
                (TokenKind::Final, "\x07"),
            ]
        );
        assert_eq!(
            kinds("\x1b]0;title\x1b\\", Mode::Raw)[2],
            (TokenKind::Final, "\x1b\\")
        );
        assert_eq!(
            kinds("\x1b]0;title\u{9c}", Mode::Raw)[2],
            (TokenKind::Final, "\u{9c}")
        );
    }

    #[test]
    fn test_bel_only_ends_osc() {
        assert_eq!(
            kinds("\x1bPq\x07x\x1b\\", Mode::Raw),
            vec![
                (TokenKind::Introducer, "\x1bP"),
                (TokenKind::Data, "q\x07x"),
                (TokenKind::Final, "\x1b\\"),
            ]
        );
    }

    #[test]
    fn test_esc_with_intermediate() {
        let tokens: Vec<_> = Tokenizer::new("\x1b(B", Mode::Raw).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].class, Some(SequenceClass::Esc));
        assert_eq!(tokens[0].intermediate, Some("("));
        assert_eq!(tokens[0].raw, "\x1b(");
        assert_eq!(tokens[1].raw, "B");
    }

    #[test]
    fn test_bare_esc() {
        assert_eq!(
            kinds("\x1b7x", Mode::Raw),
            vec![
                (TokenKind::Introducer, "\x1b"),
                (TokenKind::Final, "7"),
                (TokenKind::Text, "x"),
            ]
        );
    }

    #[test]
    fn test_cancel_consumed() {
        assert_eq!(
            kinds("\x1b[?\x18x", Mode::Raw),
            vec![
                (TokenKind::Introducer, "\x1b["),
                (TokenKind::Data, "?"),
                (TokenKind::Cancel, "\x18"),
                (TokenKind::Text, "x"),
            ]
        );
    }

    #[test]
    fn test_new_introducer_interrupts() {
        assert_eq!(
            kinds("\x1b[12\x1b[m", Mode::Raw),
            vec![
                (TokenKind::Introducer, "\x1b["),
                (TokenKind::Data, "12"),
                (TokenKind::Introducer, "\x1b["),
                (TokenKind::Final, "m"),
            ]
        );
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            kinds("\x1b]8;;http", Mode::Raw),
            vec![(TokenKind::Introducer, "\x1b]"), (TokenKind::Data, "8;;http")]
        );
        assert_eq!(kinds("x\x1b", Mode::Raw)[1], (TokenKind::Introducer, "\x1b"));
        assert_eq!(kinds("\x1b(", Mode::Raw), vec![(TokenKind::Introducer, "\x1b(")]);
    }

    #[test]
    fn test_literal_mode() {
        assert_eq!(
            kinds("\\x1b[1;31mhi\\e[0m", Mode::Literal),
            vec![
                (TokenKind::Introducer, "\\x1b["),
                (TokenKind::Data, "1;31"),
                (TokenKind::Final, "m"),
                (TokenKind::Text, "hi"),
                (TokenKind::Introducer, "\\e["),
                (TokenKind::Data, "0"),
                (TokenKind::Final, "m"),
            ]
        );
    }

    #[test]
    fn test_literal_string_terminators() {
        assert_eq!(
            kinds("\\033]0;t\\a", Mode::Literal),
            vec![
                (TokenKind::Introducer, "\\033]"),
                (TokenKind::Data, "0;t"),
                (TokenKind::Final, "\\a"),
            ]
        );
        assert_eq!(
            kinds("\\u001b]0;t\\u001b\\\\", Mode::Literal)[2],
            (TokenKind::Final, "\\u001b\\\\")
        );
    }

    #[test]
    fn test_literal_backslash_in_text() {
        assert_eq!(
            kinds("a\\nb", Mode::Literal),
            vec![(TokenKind::Text, "a\\nb")]
        );
    }

    #[test]
    fn test_lazy_early_stop() {
        let mut tokenizer = Tokenizer::new("\x1b[1m\x1b[2m\x1b[3m", Mode::Raw);
        let first: Vec<_> = tokenizer.by_ref().take(2).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(tokenizer.position(), 3);
        assert_eq!(tokenizer.next().map(|token| token.raw), Some("m"));
    }

    #[test]
    fn test_positions_cover_input() {
        let input = "x\x1b[1;2Hy\x1b]0;t\x07\x1b(0z";
        let mut expected = 0;
        for token in Tokenizer::new(input, Mode::Raw) {
            assert_eq!(token.position, expected);
            assert_eq!(&input[token.position..token.end()], token.raw);
            expected = token.end();
        }
        assert_eq!(expected, input.len());
    }
}
