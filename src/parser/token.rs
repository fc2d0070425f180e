//! Lexical tokens produced by the tokenizer
//!
//! Tokens are thin views into the caller's input: every token borrows the
//! exact slice it was scanned from, so concatenating the `raw` text of all
//! tokens reproduces the input.

use serde::Serialize;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    /// Plain text between sequences
    Text,
    /// Start of a control sequence
    Introducer,
    /// Sequence payload
    Data,
    /// Byte(s) that terminate a sequence
    Final,
    /// A consumed CAN/SUB that aborted the sequence in progress
    Cancel,
}

impl TokenKind {
    /// Upper-case name as used in serialized output
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "TEXT",
            TokenKind::Introducer => "INTRODUCER",
            TokenKind::Data => "DATA",
            TokenKind::Final => "FINAL",
            TokenKind::Cancel => "CANCEL",
        }
    }
}

/// Class of a control sequence, resolved from its introducer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SequenceClass {
    /// Control Sequence Introducer (ESC [ or 0x9B)
    Csi,
    /// Operating System Command (ESC ] or 0x9D)
    Osc,
    /// Device Control String (ESC P or 0x90)
    Dcs,
    /// Application Program Command (ESC _ or 0x9F)
    Apc,
    /// Privacy Message (ESC ^ or 0x9E)
    Pm,
    /// Start of String (ESC X or 0x98)
    Sos,
    /// Single-character escape, possibly with intermediates
    Esc,
}

impl SequenceClass {
    /// Whether the sequence carries a string payload ended by BEL or ST
    pub fn is_string(self) -> bool {
        matches!(
            self,
            SequenceClass::Osc
                | SequenceClass::Dcs
                | SequenceClass::Apc
                | SequenceClass::Pm
                | SequenceClass::Sos
        )
    }

    /// Class selected by the character following an ESC, if any
    pub fn from_opener(c: char) -> Option<Self> {
        match c {
            '[' => Some(SequenceClass::Csi),
            ']' => Some(SequenceClass::Osc),
            'P' => Some(SequenceClass::Dcs),
            '_' => Some(SequenceClass::Apc),
            '^' => Some(SequenceClass::Pm),
            'X' => Some(SequenceClass::Sos),
            _ => None,
        }
    }

    /// Short upper-case name (`CSI`, `OSC`, ...)
    pub fn name(self) -> &'static str {
        match self {
            SequenceClass::Csi => "CSI",
            SequenceClass::Osc => "OSC",
            SequenceClass::Dcs => "DCS",
            SequenceClass::Apc => "APC",
            SequenceClass::Pm => "PM",
            SequenceClass::Sos => "SOS",
            SequenceClass::Esc => "ESC",
        }
    }
}

/// One lexical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// What the token is
    pub kind: TokenKind,
    /// UTF-8 byte offset of `raw` in the input, in both modes. Literal
    /// input is usually ASCII, where this equals the character offset.
    pub position: usize,
    /// Exact source slice
    pub raw: &'a str,
    /// Sequence class (introducers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<SequenceClass>,
    /// Intermediate bytes of an ESC introducer, e.g. `(` in `ESC ( B`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<&'a str>,
}

impl<'a> Token<'a> {
    /// Create a TEXT token
    pub fn text(position: usize, raw: &'a str) -> Self {
        Self::plain(TokenKind::Text, position, raw)
    }

    /// Create an INTRODUCER token
    pub fn introducer(
        position: usize,
        raw: &'a str,
        class: SequenceClass,
        intermediate: Option<&'a str>,
    ) -> Self {
        Self {
            kind: TokenKind::Introducer,
            position,
            raw,
            class: Some(class),
            intermediate,
        }
    }

    /// Create a DATA token
    pub fn data(position: usize, raw: &'a str) -> Self {
        Self::plain(TokenKind::Data, position, raw)
    }

    /// Create a FINAL token
    pub fn final_(position: usize, raw: &'a str) -> Self {
        Self::plain(TokenKind::Final, position, raw)
    }

    /// Create a CANCEL token
    pub fn cancel(position: usize, raw: &'a str) -> Self {
        Self::plain(TokenKind::Cancel, position, raw)
    }

    fn plain(kind: TokenKind, position: usize, raw: &'a str) -> Self {
        Self {
            kind,
            position,
            raw,
            class: None,
            intermediate: None,
        }
    }

    /// Byte offset one past the end of the token
    pub fn end(&self) -> usize {
        self.position + self.raw.len()
    }
}
