//! Control codes produced by the parser
//!
//! A [`ControlCode`] is either a run of text or one control sequence. All
//! sequence classes share the same payload ([`Sequence`]); the enum variant
//! carries the classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::params::OMITTED;

/// Parsed unit of terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ControlCode {
    /// Plain text
    Text(Text),
    /// Control Sequence Introducer sequence
    Csi(Sequence),
    /// CSI sequence with a `?` parameter prefix
    Dec(Sequence),
    /// CSI sequence with a `<`, `=` or `>` parameter prefix
    Private(Sequence),
    /// Operating System Command
    Osc(Sequence),
    /// Device Control String
    Dcs(Sequence),
    /// Escape sequence without a string or CSI payload
    Esc(Sequence),
    /// APC, PM or SOS string
    String(Sequence),
}

/// Classification of a [`ControlCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeType {
    Text,
    Csi,
    Dec,
    Private,
    Osc,
    Dcs,
    Esc,
    String,
}

impl CodeType {
    /// Upper-case name as used in serialized output
    pub fn name(self) -> &'static str {
        match self {
            CodeType::Text => "TEXT",
            CodeType::Csi => "CSI",
            CodeType::Dec => "DEC",
            CodeType::Private => "PRIVATE",
            CodeType::Osc => "OSC",
            CodeType::Dcs => "DCS",
            CodeType::Esc => "ESC",
            CodeType::String => "STRING",
        }
    }
}

/// Text between sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// UTF-8 byte offset in the input (also in literal mode)
    pub position: usize,
    /// Exact source text
    pub raw: String,
    /// Decoded form of literal-mode text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,
}

impl Text {
    pub fn new(position: usize, raw: impl Into<String>) -> Self {
        Self {
            position,
            raw: raw.into(),
            plain: None,
        }
    }

    /// The text as it would appear on a terminal
    pub fn plain_text(&self) -> &str {
        self.plain.as_deref().unwrap_or(&self.raw)
    }
}

/// A parsed control sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Byte offset of the introducer
    pub position: usize,
    /// Introducer, payload and terminator as they appear in the input
    pub raw: String,
    /// Classifying suffix (final byte plus intermediates, OSC number, ...)
    pub command: String,
    /// Parameters in order; omitted ones are `"-1"`
    pub params: Vec<String>,
}

impl Sequence {
    pub fn new(
        position: usize,
        raw: impl Into<String>,
        command: impl Into<String>,
        params: Vec<String>,
    ) -> Self {
        Self {
            position,
            raw: raw.into(),
            command: command.into(),
            params,
        }
    }

    /// Parameter at `index`, or None if absent or omitted
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params
            .get(index)
            .map(String::as_str)
            .filter(|&value| value != OMITTED)
    }

    /// Parameter at `index` as a number; digit runs too large to fit
    /// saturate to `usize::MAX`
    pub fn numeric(&self, index: usize) -> Option<usize> {
        let value = self.param(index)?;
        match value.parse() {
            Ok(n) => Some(n),
            Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => Some(usize::MAX),
            Err(_) => None,
        }
    }

    /// Numeric parameter with default value for absent, omitted or
    /// non-numeric parameters
    pub fn param_or(&self, index: usize, default: usize) -> usize {
        self.numeric(index).unwrap_or(default)
    }

    /// Check if this sequence has the given command
    pub fn is(&self, command: &str) -> bool {
        self.command == command
    }
}

impl ControlCode {
    /// Classification of this code
    pub fn code_type(&self) -> CodeType {
        match self {
            ControlCode::Text(_) => CodeType::Text,
            ControlCode::Csi(_) => CodeType::Csi,
            ControlCode::Dec(_) => CodeType::Dec,
            ControlCode::Private(_) => CodeType::Private,
            ControlCode::Osc(_) => CodeType::Osc,
            ControlCode::Dcs(_) => CodeType::Dcs,
            ControlCode::Esc(_) => CodeType::Esc,
            ControlCode::String(_) => CodeType::String,
        }
    }

    /// Sequence payload, unless this is text
    pub fn sequence(&self) -> Option<&Sequence> {
        match self {
            ControlCode::Text(_) => None,
            ControlCode::Csi(seq)
            | ControlCode::Dec(seq)
            | ControlCode::Private(seq)
            | ControlCode::Osc(seq)
            | ControlCode::Dcs(seq)
            | ControlCode::Esc(seq)
            | ControlCode::String(seq) => Some(seq),
        }
    }

    /// Text payload, if this is text
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            ControlCode::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ControlCode::Text(_))
    }

    /// Byte offset in the input
    pub fn position(&self) -> usize {
        match self {
            ControlCode::Text(text) => text.position,
            _ => self.sequence().map_or(0, |seq| seq.position),
        }
    }

    /// Exact source text
    pub fn raw(&self) -> &str {
        match self {
            ControlCode::Text(text) => &text.raw,
            _ => self.sequence().map_or("", |seq| seq.raw.as_str()),
        }
    }

    /// Byte offset one past the end of the code
    pub fn end(&self) -> usize {
        self.position() + self.raw().len()
    }

    /// Command of a sequence
    pub fn command(&self) -> Option<&str> {
        self.sequence().map(|seq| seq.command.as_str())
    }

    /// Parameters of a sequence; empty for text
    pub fn params(&self) -> &[String] {
        self.sequence()
            .map(|seq| seq.params.as_slice())
            .unwrap_or_default()
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCode::Text(text) => write!(
                f,
                "{:<8}@{:<6}{:?}",
                CodeType::Text.name(),
                text.position,
                text.plain_text()
            ),
            _ => write!(
                f,
                "{:<8}@{:<6}{:?} {:?}",
                self.code_type().name(),
                self.position(),
                self.command().unwrap_or_default(),
                self.params()
            ),
        }
    }
}

/// Concatenate the plain text of all TEXT codes, dropping every sequence
pub fn plain_text<'c>(codes: impl IntoIterator<Item = &'c ControlCode>) -> String {
    codes
        .into_iter()
        .filter_map(ControlCode::as_text)
        .map(Text::plain_text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sgr(params: &[&str]) -> Sequence {
        Sequence::new(
            0,
            "\x1b[m",
            "m",
            params.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn test_sequence_params() {
        let seq = sgr(&["-1", "5", "x"]);
        assert_eq!(seq.param(0), None);
        assert_eq!(seq.param(1), Some("5"));
        assert_eq!(seq.numeric(1), Some(5));
        assert_eq!(seq.numeric(2), None);
        assert_eq!(seq.param_or(0, 1), 1);
        assert_eq!(seq.param_or(1, 1), 5);
        assert_eq!(seq.param_or(9, 7), 7);
        assert!(seq.is("m"));
    }

    #[test]
    fn test_oversized_numeric_saturates() {
        let seq = sgr(&["99999999999999999999999", "", "12x"]);
        assert_eq!(seq.numeric(0), Some(usize::MAX));
        assert_eq!(seq.param_or(0, 1), usize::MAX);
        assert_eq!(seq.numeric(1), None);
        assert_eq!(seq.numeric(2), None);
    }

    #[test]
    fn test_serialization_tag() {
        let code = ControlCode::Csi(sgr(&["31"]));
        let json = serde_json::to_string(&code).unwrap();
        assert!(json.starts_with(r#"{"type":"CSI","position":0"#));
        let back: ControlCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);

        let text = ControlCode::Text(Text::new(3, "hi"));
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"type":"TEXT","position":3,"raw":"hi"}"#);
    }

    #[test]
    fn test_accessors() {
        let code = ControlCode::Private(Sequence::new(4, "\x1b[>c", ">c", vec![]));
        assert_eq!(code.code_type(), CodeType::Private);
        assert_eq!(code.position(), 4);
        assert_eq!(code.end(), 8);
        assert_eq!(code.command(), Some(">c"));
        assert!(code.params().is_empty());
        assert!(code.as_text().is_none());
    }

    #[test]
    fn test_plain_text() {
        let mut literal = Text::new(0, "a\\tb");
        literal.plain = Some("a\tb".to_string());
        let codes = vec![
            ControlCode::Text(literal),
            ControlCode::Csi(sgr(&[])),
            ControlCode::Text(Text::new(9, "c")),
        ];
        assert_eq!(plain_text(&codes), "a\tbc");
    }

    #[test]
    fn test_display() {
        let code = ControlCode::Csi(sgr(&["31"]));
        assert_eq!(code.to_string(), "CSI     @0     \"m\" [\"31\"]");
    }
}
