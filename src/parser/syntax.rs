//! Introducer, interrupter and terminator tables
//!
//! The same control bytes reach us in two spellings: as the bytes
//! themselves (raw mode) or as the backslash escapes people paste from shell
//! scripts and source code (literal mode, e.g. `\x1b[31m`). The tokenizer
//! runs one state machine over both; everything that depends on the
//! spelling lives behind the [`Syntax`] trait, with one table-driven
//! implementation per mode.
//!
//! All tables are constants and shared by every tokenizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::token::SequenceClass;
use crate::error::Error;

/// Escape (0x1B)
pub const ESC: char = '\x1b';
/// Bell (0x07), OSC terminator
pub const BEL: char = '\x07';
/// Cancel (0x18)
pub const CAN: char = '\x18';
/// Substitute (0x1A)
pub const SUB: char = '\x1a';
/// 8-bit Device Control String
pub const DCS: char = '\u{90}';
/// 8-bit Start of String
pub const SOS: char = '\u{98}';
/// 8-bit Control Sequence Introducer
pub const CSI: char = '\u{9b}';
/// 8-bit String Terminator
pub const ST: char = '\u{9c}';
/// 8-bit Operating System Command
pub const OSC: char = '\u{9d}';
/// 8-bit Privacy Message
pub const PM: char = '\u{9e}';
/// 8-bit Application Program Command
pub const APC: char = '\u{9f}';

/// How control bytes are spelled in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Actual control bytes (ESC is 0x1B)
    #[default]
    Raw,
    /// Backslash escapes (ESC is `\x1b`, `\u001b`, `\033` or `\e`)
    Literal,
}

impl Mode {
    /// Guess the mode of a piece of text: anything carrying a real ESC or
    /// 8-bit introducer is raw, everything else is treated as literal.
    pub fn detect(input: &str) -> Self {
        if input.contains(|c: char| c == ESC || c1_class(c).is_some()) {
            Mode::Raw
        } else {
            Mode::Literal
        }
    }

    /// Lower-case name of the mode
    pub fn name(self) -> &'static str {
        match self {
            Mode::Raw => "raw",
            Mode::Literal => "literal",
        }
    }

    pub(crate) fn syntax(self) -> &'static dyn Syntax {
        match self {
            Mode::Raw => &RawSyntax,
            Mode::Literal => &LiteralSyntax,
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Mode::Raw),
            "literal" | "escaped" => Ok(Mode::Literal),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What starts a sequence at a given position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lead {
    /// An ESC spelling of the given length; the class depends on what follows
    Escape(usize),
    /// A single 8-bit introducer spelling of the given length
    Control(SequenceClass, usize),
}

/// Spelling-dependent scanning primitives
///
/// Every method looks at `input` starting at byte offset `at` and returns
/// the byte length of the match.
pub(crate) trait Syntax: Sync {
    /// Match a sequence introducer
    fn lead(&self, input: &str, at: usize) -> Option<Lead>;

    /// First offset at or after `from` where [`Syntax::lead`] matches
    fn find_lead(&self, input: &str, from: usize) -> Option<usize>;

    /// Match CAN or SUB
    fn cancel(&self, input: &str, at: usize) -> Option<usize>;

    /// Match BEL
    fn bell(&self, input: &str, at: usize) -> Option<usize>;

    /// Match the single-character String Terminator
    fn string_terminator(&self, input: &str, at: usize) -> Option<usize>;

    /// Match the backslash completing a two-character `ESC \` terminator
    fn escaped_backslash(&self, input: &str, at: usize) -> Option<usize>;

    /// Whether `c` ends a CSI sequence
    fn is_csi_final(&self, c: char) -> bool;

    /// Match any terminator of a string-class sequence
    fn terminator(&self, input: &str, at: usize, class: SequenceClass) -> Option<usize> {
        if class == SequenceClass::Osc {
            if let Some(len) = self.bell(input, at) {
                return Some(len);
            }
        }
        if let Some(len) = self.string_terminator(input, at) {
            return Some(len);
        }
        match self.lead(input, at)? {
            Lead::Escape(len) => self
                .escaped_backslash(input, at + len)
                .map(|tail| len + tail),
            Lead::Control(..) => None,
        }
    }
}

/// Class of an 8-bit introducer
fn c1_class(c: char) -> Option<SequenceClass> {
    match c {
        CSI => Some(SequenceClass::Csi),
        OSC => Some(SequenceClass::Osc),
        DCS => Some(SequenceClass::Dcs),
        APC => Some(SequenceClass::Apc),
        PM => Some(SequenceClass::Pm),
        SOS => Some(SequenceClass::Sos),
        _ => None,
    }
}

fn first_char(input: &str, at: usize) -> Option<char> {
    input.get(at..)?.chars().next()
}

/// Actual control bytes
struct RawSyntax;

impl Syntax for RawSyntax {
    fn lead(&self, input: &str, at: usize) -> Option<Lead> {
        let c = first_char(input, at)?;
        if c == ESC {
            Some(Lead::Escape(1))
        } else {
            c1_class(c).map(|class| Lead::Control(class, c.len_utf8()))
        }
    }

    fn find_lead(&self, input: &str, from: usize) -> Option<usize> {
        input
            .get(from..)?
            .find(|c: char| c == ESC || c1_class(c).is_some())
            .map(|offset| from + offset)
    }

    fn cancel(&self, input: &str, at: usize) -> Option<usize> {
        matches!(first_char(input, at)?, CAN | SUB).then_some(1)
    }

    fn bell(&self, input: &str, at: usize) -> Option<usize> {
        (first_char(input, at)? == BEL).then_some(1)
    }

    fn string_terminator(&self, input: &str, at: usize) -> Option<usize> {
        (first_char(input, at)? == ST).then_some(ST.len_utf8())
    }

    fn escaped_backslash(&self, input: &str, at: usize) -> Option<usize> {
        (first_char(input, at)? == '\\').then_some(1)
    }

    fn is_csi_final(&self, c: char) -> bool {
        ('\x40'..='\x7e').contains(&c)
    }
}

const ESCAPE_SPELLINGS: &[&str] = &["\\u001b", "\\x1b", "\\033", "\\e"];

const CONTROL_SPELLINGS: &[(&str, SequenceClass)] = &[
    ("\\u009b", SequenceClass::Csi),
    ("\\x9b", SequenceClass::Csi),
    ("\\u009d", SequenceClass::Osc),
    ("\\x9d", SequenceClass::Osc),
    ("\\u0090", SequenceClass::Dcs),
    ("\\x90", SequenceClass::Dcs),
    ("\\u009f", SequenceClass::Apc),
    ("\\x9f", SequenceClass::Apc),
    ("\\u009e", SequenceClass::Pm),
    ("\\x9e", SequenceClass::Pm),
    ("\\u0098", SequenceClass::Sos),
    ("\\x98", SequenceClass::Sos),
];

const CANCEL_SPELLINGS: &[&str] = &["\\u0018", "\\u001a", "\\x18", "\\x1a", "\\030", "\\032"];

const BELL_SPELLINGS: &[&str] = &["\\u0007", "\\x07", "\\007", "\\a"];

const ST_SPELLINGS: &[&str] = &["\\u009c", "\\x9c", "\\234"];

/// Whether `spelling` occurs at `at`, ignoring ASCII case
fn spelled(input: &str, at: usize, spelling: &str) -> bool {
    input
        .get(at..at + spelling.len())
        .is_some_and(|candidate| candidate.eq_ignore_ascii_case(spelling))
}

fn match_any(input: &str, at: usize, spellings: &[&str]) -> Option<usize> {
    spellings
        .iter()
        .find(|spelling| spelled(input, at, spelling))
        .map(|spelling| spelling.len())
}

/// Backslash escapes
struct LiteralSyntax;

impl Syntax for LiteralSyntax {
    fn lead(&self, input: &str, at: usize) -> Option<Lead> {
        if input.as_bytes().get(at) != Some(&b'\\') {
            return None;
        }
        if let Some(len) = match_any(input, at, ESCAPE_SPELLINGS) {
            return Some(Lead::Escape(len));
        }
        CONTROL_SPELLINGS
            .iter()
            .find(|(spelling, _)| spelled(input, at, spelling))
            .map(|(spelling, class)| Lead::Control(*class, spelling.len()))
    }

    fn find_lead(&self, input: &str, from: usize) -> Option<usize> {
        input
            .get(from..)?
            .match_indices('\\')
            .map(|(offset, _)| from + offset)
            .find(|&at| self.lead(input, at).is_some())
    }

    fn cancel(&self, input: &str, at: usize) -> Option<usize> {
        match_any(input, at, CANCEL_SPELLINGS)
    }

    fn bell(&self, input: &str, at: usize) -> Option<usize> {
        match_any(input, at, BELL_SPELLINGS)
    }

    fn string_terminator(&self, input: &str, at: usize) -> Option<usize> {
        match_any(input, at, ST_SPELLINGS)
    }

    fn escaped_backslash(&self, input: &str, at: usize) -> Option<usize> {
        let rest = input.get(at..)?;
        if rest.starts_with("\\\\") {
            return Some(2);
        }
        // A lone backslash only counts when it does not open another escape
        let opens_escape = self.lead(input, at).is_some()
            || self.cancel(input, at).is_some()
            || self.bell(input, at).is_some()
            || self.string_terminator(input, at).is_some();
        (rest.starts_with('\\') && !opens_escape).then_some(1)
    }

    fn is_csi_final(&self, c: char) -> bool {
        c != '\\' && ('\x40'..='\x7e').contains(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("raw".parse::<Mode>().unwrap(), Mode::Raw);
        assert_eq!("Literal".parse::<Mode>().unwrap(), Mode::Literal);
        assert_eq!("escaped".parse::<Mode>().unwrap(), Mode::Literal);
        assert!(matches!("hex".parse::<Mode>(), Err(Error::InvalidMode(m)) if m == "hex"));
    }

    #[test]
    fn test_mode_detect() {
        assert_eq!(Mode::detect("\x1b[31mred"), Mode::Raw);
        assert_eq!(Mode::detect("\u{9b}31m"), Mode::Raw);
        assert_eq!(Mode::detect("\\x1b[31mred"), Mode::Literal);
        assert_eq!(Mode::detect("plain"), Mode::Literal);
    }

    #[test]
    fn test_raw_leads() {
        let syntax = Mode::Raw.syntax();
        assert_eq!(syntax.lead("\x1b[", 0), Some(Lead::Escape(1)));
        assert_eq!(
            syntax.lead("a\u{9b}", 1),
            Some(Lead::Control(SequenceClass::Csi, 2))
        );
        assert_eq!(syntax.lead("a", 0), None);
        assert_eq!(syntax.find_lead("abc\x1b", 0), Some(3));
        assert_eq!(syntax.find_lead("abc\x1b", 4), None);
    }

    #[test]
    fn test_literal_leads() {
        let syntax = Mode::Literal.syntax();
        assert_eq!(syntax.lead("\\x1b[", 0), Some(Lead::Escape(4)));
        assert_eq!(syntax.lead("\\X1B", 0), Some(Lead::Escape(4)));
        assert_eq!(syntax.lead("\\u001B", 0), Some(Lead::Escape(6)));
        assert_eq!(syntax.lead("\\033", 0), Some(Lead::Escape(4)));
        assert_eq!(syntax.lead("\\e", 0), Some(Lead::Escape(2)));
        assert_eq!(
            syntax.lead("\\x9b", 0),
            Some(Lead::Control(SequenceClass::Csi, 4))
        );
        assert_eq!(syntax.lead("\\n", 0), None);
        assert_eq!(syntax.find_lead("a\\nb\\e[", 0), Some(4));
    }

    #[test]
    fn test_terminators() {
        let raw = Mode::Raw.syntax();
        assert_eq!(raw.terminator("\x07", 0, SequenceClass::Osc), Some(1));
        assert_eq!(raw.terminator("\x07", 0, SequenceClass::Dcs), None);
        assert_eq!(raw.terminator("\x1b\\", 0, SequenceClass::Apc), Some(2));
        assert_eq!(raw.terminator("\u{9c}", 0, SequenceClass::Pm), Some(2));
        assert_eq!(raw.terminator("\x1b[", 0, SequenceClass::Osc), None);

        let literal = Mode::Literal.syntax();
        assert_eq!(literal.terminator("\\a", 0, SequenceClass::Osc), Some(2));
        assert_eq!(literal.terminator("\\x07", 0, SequenceClass::Osc), Some(4));
        assert_eq!(literal.terminator("\\x1b\\\\", 0, SequenceClass::Osc), Some(6));
        assert_eq!(literal.terminator("\\e\\", 0, SequenceClass::Dcs), Some(3));
        assert_eq!(literal.terminator("\\x1b\\x1b[", 0, SequenceClass::Osc), None);
        assert_eq!(literal.terminator("\\u009c", 0, SequenceClass::Sos), Some(6));
    }

    #[test]
    fn test_cancel_and_finals() {
        assert_eq!(Mode::Raw.syntax().cancel("\x18", 0), Some(1));
        assert_eq!(Mode::Literal.syntax().cancel("\\x1A", 0), Some(4));
        assert_eq!(Mode::Literal.syntax().cancel("\\u0018", 0), Some(6));
        assert!(Mode::Raw.syntax().is_csi_final('\\'));
        assert!(!Mode::Literal.syntax().is_csi_final('\\'));
        assert!(Mode::Literal.syntax().is_csi_final('m'));
        assert!(!Mode::Raw.syntax().is_csi_final(';'));
    }
}
