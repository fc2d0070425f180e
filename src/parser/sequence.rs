//! Per-class sequence parsers
//!
//! Each parser receives the pieces the assembler collected for one
//! sequence and builds the matching [`ControlCode`]. None of them fail:
//! truncated or odd payloads produce a best-effort code.

use super::code::{ControlCode, Sequence};
use super::params::{normalize_sgr, split_csi, split_params};
use super::token::SequenceClass;

/// DCS payload prefixes with a known meaning, checked in order
const DCS_PATTERNS: &[&str] = &["$q", "+q", "+p", "|", "{"];

/// OSC command whose payload is never split
const OSC_ITERM: &str = "1337";

/// Everything the assembler knows about one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parts<'s> {
    /// Byte offset of the introducer
    pub position: usize,
    pub class: SequenceClass,
    /// Intermediate bytes stored on an ESC introducer
    pub intermediate: Option<&'s str>,
    /// Concatenated payload
    pub data: &'s str,
    /// Final byte or terminator, if the sequence was completed
    pub final_: Option<&'s str>,
}

/// Build the control code for a collected sequence
pub fn parse_sequence(parts: Parts<'_>, raw: String) -> ControlCode {
    let Parts {
        position,
        class,
        intermediate,
        data,
        final_,
    } = parts;

    match class {
        SequenceClass::Csi => parse_csi(position, raw, data, final_.unwrap_or_default()),
        SequenceClass::Osc => parse_osc(position, raw, data),
        SequenceClass::Dcs => parse_dcs(position, raw, data),
        SequenceClass::Apc | SequenceClass::Pm | SequenceClass::Sos => {
            let params = if data.is_empty() {
                Vec::new()
            } else {
                vec![data.to_string()]
            };
            ControlCode::String(Sequence::new(position, raw, class.name(), params))
        }
        SequenceClass::Esc => parse_esc(position, raw, intermediate, final_),
    }
}

/// CSI, DEC and PRIVATE sequences
///
/// The first parameter byte decides the class: `?` is DEC, `<`, `=` and
/// `>` are PRIVATE, anything else is plain CSI.
fn parse_csi(position: usize, raw: String, data: &str, final_: &str) -> ControlCode {
    let (section, intermediates) = split_csi(data);

    match section.chars().next() {
        Some('?') => {
            let params = split_params(&section[1..]);
            let command = format!("{intermediates}{final_}");
            ControlCode::Dec(Sequence::new(position, raw, command, params))
        }
        Some(prefix @ ('<' | '=' | '>')) => {
            let params = split_params(&section[1..]);
            let command = format!("{prefix}{intermediates}{final_}");
            ControlCode::Private(Sequence::new(position, raw, command, params))
        }
        _ => {
            let mut params = split_params(section);
            let command = format!("{intermediates}{final_}");
            if command == "m" {
                normalize_sgr(&mut params);
            }
            ControlCode::Csi(Sequence::new(position, raw, command, params))
        }
    }
}

/// OSC: numeric command up to the first `;`, parameters after it
fn parse_osc(position: usize, raw: String, data: &str) -> ControlCode {
    let Some((command, remainder)) = data.split_once(';') else {
        return ControlCode::Osc(Sequence::new(position, raw, data, Vec::new()));
    };

    let params = if command == OSC_ITERM {
        vec![remainder.to_string()]
    } else if remainder.is_empty() {
        Vec::new()
    } else {
        remainder.split(';').map(str::to_string).collect()
    };
    ControlCode::Osc(Sequence::new(position, raw, command, params))
}

/// DCS: known prefix as command, remainder as parameters
fn parse_dcs(position: usize, raw: String, data: &str) -> ControlCode {
    if data.is_empty() {
        return ControlCode::Dcs(Sequence::new(position, raw, "", Vec::new()));
    }

    match DCS_PATTERNS
        .iter()
        .find(|pattern| data.starts_with(*pattern))
    {
        Some(pattern) => {
            let params = split_params(&data[pattern.len()..]);
            ControlCode::Dcs(Sequence::new(position, raw, *pattern, params))
        }
        None => ControlCode::Dcs(Sequence::new(position, raw, "", vec![data.to_string()])),
    }
}

/// ESC: intermediate as command when present, final byte otherwise
fn parse_esc(
    position: usize,
    raw: String,
    intermediate: Option<&str>,
    final_: Option<&str>,
) -> ControlCode {
    // An escaped backslash (`\\` in literal text) stands for one `\`
    let final_ = final_.map(|f| if f == "\\\\" { "\\" } else { f });
    let (command, params) = match intermediate {
        Some(intermediate) => (
            intermediate.to_string(),
            final_.map(str::to_string).into_iter().collect(),
        ),
        None => (final_.unwrap_or_default().to_string(), Vec::new()),
    };
    ControlCode::Esc(Sequence::new(position, raw, command, params))
}
