//! Buffer-visible commands
//!
//! Maps control codes onto the small set of operations the virtual buffer
//! models. Everything else (colors, titles, modes) has no effect on the
//! buffer and classifies as `None`.

use crate::parser::{ControlCode, Sequence};

/// Region selected by an erase command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end
    ToEnd,
    /// From the start up to the cursor
    ToStart,
    /// Everything
    All,
}

impl EraseMode {
    /// Mode of an erase-in-display (`J`) parameter
    pub fn display(mode: usize) -> Option<Self> {
        match mode {
            0 => Some(EraseMode::ToEnd),
            1 => Some(EraseMode::ToStart),
            // 3 also clears scrollback, which the buffer does not keep
            2 | 3 => Some(EraseMode::All),
            _ => None,
        }
    }

    /// Mode of an erase-in-line (`K`) parameter
    pub fn line(mode: usize) -> Option<Self> {
        match mode {
            0 => Some(EraseMode::ToEnd),
            1 => Some(EraseMode::ToStart),
            2 => Some(EraseMode::All),
            _ => None,
        }
    }
}

/// Operation on the virtual buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferCommand<'c> {
    /// Write text at the cursor
    Text(&'c str),
    /// CUU
    CursorUp(usize),
    /// CUD
    CursorDown(usize),
    /// CUF
    CursorForward(usize),
    /// CUB
    CursorBack(usize),
    /// CNL
    NextLine(usize),
    /// CPL
    PreviousLine(usize),
    /// CHA (1-based column)
    Column(usize),
    /// CUP/HVP (1-based row and column)
    Position { row: usize, col: usize },
    /// DECSC or SCOSC
    SaveCursor,
    /// DECRC or SCORC
    RestoreCursor,
    /// ED
    EraseDisplay(EraseMode),
    /// EL
    EraseLine(EraseMode),
    /// RIS
    Reset,
    /// Recognized, but without effect on the buffer (scrolling, cursor
    /// visibility)
    NoOp,
}

impl<'c> BufferCommand<'c> {
    /// Classify a control code, or None if it does not concern the buffer
    pub fn classify(code: &'c ControlCode) -> Option<Self> {
        match code {
            ControlCode::Text(text) => Some(BufferCommand::Text(text.plain_text())),
            ControlCode::Csi(seq) => Self::csi(seq),
            ControlCode::Dec(seq) => {
                let visibility = matches!(seq.command.as_str(), "h" | "l")
                    && seq.params.iter().any(|p| p == "25");
                visibility.then_some(BufferCommand::NoOp)
            }
            ControlCode::Esc(seq) => match seq.command.as_str() {
                "7" => Some(BufferCommand::SaveCursor),
                "8" => Some(BufferCommand::RestoreCursor),
                "c" => Some(BufferCommand::Reset),
                _ => None,
            },
            _ => None,
        }
    }

    fn csi(seq: &Sequence) -> Option<Self> {
        let n = count(seq, 0);
        let command = match seq.command.as_str() {
            "A" => BufferCommand::CursorUp(n),
            "B" => BufferCommand::CursorDown(n),
            "C" => BufferCommand::CursorForward(n),
            "D" => BufferCommand::CursorBack(n),
            "E" => BufferCommand::NextLine(n),
            "F" => BufferCommand::PreviousLine(n),
            "G" => BufferCommand::Column(n),
            "H" | "f" => BufferCommand::Position {
                row: n,
                col: count(seq, 1),
            },
            "J" => BufferCommand::EraseDisplay(EraseMode::display(seq.param_or(0, 0))?),
            "K" => BufferCommand::EraseLine(EraseMode::line(seq.param_or(0, 0))?),
            "s" => BufferCommand::SaveCursor,
            "u" => BufferCommand::RestoreCursor,
            "S" | "T" => BufferCommand::NoOp,
            _ => return None,
        };
        Some(command)
    }
}

/// Count parameter at `index`; omitted, absent and 0 all mean 1
fn count(seq: &Sequence, index: usize) -> usize {
    match seq.param_or(index, 1) {
        0 => 1,
        n => n,
    }
}
