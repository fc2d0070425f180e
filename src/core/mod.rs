//! Virtual terminal buffer
//!
//! Replays control codes against an unbounded line buffer:
//! - Text placement at the cursor
//! - Cursor movement, save and restore
//! - Erase in display and in line, with a frame captured before each erase
//!
//! Replay is deterministic: the same control codes always produce the same
//! snapshot.

mod buffer;
mod commands;
mod cursor;
mod snapshot;
mod stream;

pub use buffer::VirtualTerminalBuffer;
pub use commands::{BufferCommand, EraseMode};
pub use cursor::Cursor;
pub use snapshot::Snapshot;
pub use stream::RenderStream;

use crate::parser::{parser, Mode};

/// Parse `input` and replay it on a fresh buffer
pub fn render(input: &str, mode: Mode) -> Snapshot {
    let mut buffer = VirtualTerminalBuffer::new();
    for code in parser(input, mode) {
        buffer.apply(&code);
    }
    buffer.into_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_modes() {
        let raw = render("a\x1b[2Jb", Mode::Raw);
        let literal = render("a\\x1b[2Jb", Mode::Literal);
        assert_eq!(raw, literal);
        assert_eq!(raw.lines, ["b"]);
    }

    #[test]
    fn test_render_literal_newlines() {
        let snapshot = render("one\\ntwo\\r\\nthree", Mode::Literal);
        assert_eq!(snapshot.lines, ["one", "two", "three"]);
        assert_eq!(snapshot.cursor, Cursor::at(5, 2));
    }
}
