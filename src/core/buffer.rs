//! Virtual terminal buffer
//!
//! A line buffer with a cursor, just enough to show what line-oriented
//! terminal output looks like once cursor movement and erasing have been
//! applied. There is no screen size: lines are created as the cursor moves
//! past the last one and erasing can remove them again.
//!
//! Before every erase the buffer text is captured as a frame, so callers
//! can see what was on screen right before it was cleared.

use crate::parser::ControlCode;

use super::commands::{BufferCommand, EraseMode};
use super::cursor::Cursor;
use super::snapshot::Snapshot;

/// Line buffer with cursor and frame history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualTerminalBuffer {
    /// Never empty
    lines: Vec<String>,
    cursor: Cursor,
    saved: Option<Cursor>,
    frames: Vec<String>,
}

impl Default for VirtualTerminalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTerminalBuffer {
    /// Create a buffer with one empty line and the cursor at home
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::new(),
            saved: None,
            frames: Vec::new(),
        }
    }

    /// Replay `codes` on a fresh buffer
    pub fn from_control_codes<'c>(codes: impl IntoIterator<Item = &'c ControlCode>) -> Snapshot {
        let mut buffer = Self::new();
        buffer.apply_all(codes);
        buffer.into_snapshot()
    }

    /// Apply every code in order
    pub fn apply_all<'c>(&mut self, codes: impl IntoIterator<Item = &'c ControlCode>) {
        for code in codes {
            self.apply(code);
        }
    }

    /// Apply one code; codes without effect on the buffer are ignored
    pub fn apply(&mut self, code: &ControlCode) {
        match BufferCommand::classify(code) {
            Some(command) => self.execute(command),
            None => tracing::trace!(
                "Ignoring {} code at {}",
                code.code_type().name(),
                code.position()
            ),
        }
    }

    /// Execute a buffer command
    pub fn execute(&mut self, command: BufferCommand<'_>) {
        match command {
            BufferCommand::Text(text) => self.write_text(text),
            BufferCommand::CursorUp(n) => {
                self.cursor.move_up(n);
                self.clamp_col();
            }
            BufferCommand::CursorDown(n) => {
                let last_row = self.last_row();
                self.cursor.move_down(n, last_row);
                self.clamp_col();
            }
            BufferCommand::CursorForward(n) => {
                let width = self.width();
                self.cursor.move_right(n, width);
            }
            BufferCommand::CursorBack(n) => self.cursor.move_left(n),
            BufferCommand::NextLine(n) => {
                let last_row = self.last_row();
                self.cursor.move_down(n, last_row);
                self.cursor.carriage_return();
            }
            BufferCommand::PreviousLine(n) => {
                self.cursor.move_up(n);
                self.cursor.carriage_return();
            }
            BufferCommand::Column(col) => {
                self.cursor.col = col.saturating_sub(1);
                self.clamp_col();
            }
            BufferCommand::Position { row, col } => {
                self.cursor = Cursor::at(col.saturating_sub(1), row.saturating_sub(1));
                self.clamp();
            }
            BufferCommand::SaveCursor => self.saved = Some(self.cursor),
            BufferCommand::RestoreCursor => {
                if let Some(saved) = self.saved {
                    self.cursor = saved;
                    self.clamp();
                }
            }
            BufferCommand::EraseDisplay(mode) => self.erase_display(mode),
            BufferCommand::EraseLine(mode) => self.erase_line(mode),
            BufferCommand::Reset => self.erase_display(EraseMode::All),
            BufferCommand::NoOp => {}
        }
    }

    /// Current lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Frames captured so far
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Buffer as one string
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Captured frames followed by the current buffer text
    pub fn frames_with_current(&self) -> Vec<String> {
        self.snapshot().frames_with_current()
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.clone().into_snapshot()
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            lines: self.lines,
            frames: self.frames,
            cursor: self.cursor,
        }
    }

    fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    /// Width of the cursor's line in characters
    fn width(&self) -> usize {
        self.lines[self.cursor.row].chars().count()
    }

    fn clamp_col(&mut self) {
        let width = self.width();
        self.cursor.clamp_col(width);
    }

    fn clamp(&mut self) {
        self.cursor.clamp_row(self.lines.len());
        self.clamp_col();
    }

    fn write_text(&mut self, text: &str) {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.newline();
            }
            for (index, segment) in line.split('\r').enumerate() {
                if index > 0 {
                    self.cursor.carriage_return();
                }
                self.write_segment(segment);
            }
        }
    }

    /// Overwrite characters from the cursor onward, padding if needed
    fn write_segment(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }
        let col = self.cursor.col;
        let len = segment.chars().count();
        let line = &mut self.lines[self.cursor.row];

        let width = line.chars().count();
        if width < col {
            line.extend(std::iter::repeat(' ').take(col - width));
        }

        let start = byte_index(line, col);
        let end = byte_index(line, col + len);
        line.replace_range(start..end, segment);
        self.cursor.col += len;
    }

    fn newline(&mut self) {
        self.cursor.row += 1;
        if self.cursor.row == self.lines.len() {
            self.lines.push(String::new());
        }
        self.cursor.carriage_return();
    }

    fn push_frame(&mut self) {
        self.frames.push(self.text());
    }

    fn erase_display(&mut self, mode: EraseMode) {
        self.push_frame();
        match mode {
            EraseMode::ToEnd => {
                self.truncate_line();
                self.lines.truncate(self.cursor.row + 1);
            }
            EraseMode::ToStart => {
                self.blank_to_cursor();
                self.lines.drain(..self.cursor.row);
                self.cursor.row = 0;
            }
            EraseMode::All => {
                self.lines = vec![String::new()];
                self.cursor = Cursor::new();
            }
        }
    }

    fn erase_line(&mut self, mode: EraseMode) {
        self.push_frame();
        match mode {
            EraseMode::ToEnd => self.truncate_line(),
            EraseMode::ToStart => self.blank_to_cursor(),
            EraseMode::All => {
                self.lines[self.cursor.row].clear();
                self.clamp_col();
            }
        }
    }

    fn truncate_line(&mut self) {
        let line = &mut self.lines[self.cursor.row];
        let at = byte_index(line, self.cursor.col);
        line.truncate(at);
    }

    fn blank_to_cursor(&mut self) {
        let col = self.cursor.col;
        let line = &mut self.lines[self.cursor.row];
        let end = byte_index(line, col);
        line.replace_range(..end, &" ".repeat(col));
    }
}

/// Byte offset of character `col` in `line`, or its length if shorter
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Mode};

    fn render(input: &str) -> VirtualTerminalBuffer {
        let mut buffer = VirtualTerminalBuffer::new();
        buffer.apply_all(&parse(input, Mode::Raw));
        buffer
    }

    #[test]
    fn test_new_buffer() {
        let buffer = VirtualTerminalBuffer::new();
        assert_eq!(buffer.lines(), [""]);
        assert_eq!(buffer.cursor(), Cursor::new());
        assert!(buffer.frames().is_empty());
    }

    #[test]
    fn test_write_text() {
        let buffer = render("hello\nworld");
        assert_eq!(buffer.lines(), ["hello", "world"]);
        assert_eq!(buffer.cursor(), Cursor::at(5, 1));
    }

    #[test]
    fn test_carriage_return_overwrites() {
        let buffer = render("hello\rJ");
        assert_eq!(buffer.lines(), ["Jello"]);
        assert_eq!(buffer.cursor(), Cursor::at(1, 0));

        let buffer = render("ab\r\ncd");
        assert_eq!(buffer.lines(), ["ab", "cd"]);
    }

    #[test]
    fn test_erase_all_snapshot() {
        let buffer = render("AB\x1b[2J");
        assert_eq!(buffer.frames(), ["AB"]);
        assert_eq!(buffer.lines(), [""]);
        assert_eq!(buffer.cursor(), Cursor::new());
    }

    #[test]
    fn test_progress_bar() {
        let buffer = render("10%\x1b[1G\x1b[K50%\x1b[1G\x1b[K100%");
        assert_eq!(buffer.lines(), ["100%"]);
        assert_eq!(buffer.frames(), ["10%", "50%"]);
    }

    #[test]
    fn test_cursor_up_and_overwrite() {
        let buffer = render("one\ntwo\x1b[A\rONE");
        assert_eq!(buffer.lines(), ["ONE", "two"]);
        assert_eq!(buffer.cursor(), Cursor::at(3, 0));
    }

    #[test]
    fn test_cursor_down_clamped() {
        let buffer = render("a\nb\x1b[9A\x1b[9B");
        assert_eq!(buffer.cursor().row, 1);
    }

    #[test]
    fn test_column_clamped_to_line() {
        let buffer = render("abc\x1b[10C");
        assert_eq!(buffer.cursor().col, 3);
        let buffer = render("abc\x1b[2D");
        assert_eq!(buffer.cursor().col, 1);
        let buffer = render("abcdef\x1b[3GX");
        assert_eq!(buffer.lines(), ["abXdef"]);
    }

    #[test]
    fn test_position() {
        let buffer = render("abc\ndef\x1b[1;2HX");
        assert_eq!(buffer.lines(), ["aXc", "def"]);
        let buffer = render("abc\x1b[5;9H");
        assert_eq!(buffer.cursor(), Cursor::at(3, 0));
    }

    #[test]
    fn test_oversized_parameters_clamp() {
        let buffer = render("a\nb\nc\x1b[99999999999A");
        assert_eq!(buffer.cursor(), Cursor::at(1, 0));
        let buffer = render("a\nb\nc\x1b[1;1H\x1b[99999999999;1H");
        assert_eq!(buffer.cursor(), Cursor::at(0, 2));
        let buffer = render("abc\x1b[1;99999999999999999999H");
        assert_eq!(buffer.cursor(), Cursor::at(3, 0));
        let buffer = render("a\nb\x1b[H\x1b[99999999999B");
        assert_eq!(buffer.cursor().row, 1);
    }

    #[test]
    fn test_next_previous_line() {
        let buffer = render("ab\ncd\x1b[Fx");
        assert_eq!(buffer.lines(), ["xb", "cd"]);
        let buffer = render("ab\ncd\x1b[A\x1b[Ey");
        assert_eq!(buffer.lines(), ["ab", "yd"]);
    }

    #[test]
    fn test_save_restore() {
        let buffer = render("ab\x1b7\ncd\x1b8X");
        assert_eq!(buffer.lines(), ["abX", "cd"]);

        let buffer = render("ab\x1b8X");
        assert_eq!(buffer.lines(), ["abX"]);

        let buffer = render("abc\x1b[s\x1b[2J\x1b[u");
        assert_eq!(buffer.cursor(), Cursor::new());
    }

    #[test]
    fn test_erase_in_line() {
        let buffer = render("abcdef\x1b[3D\x1b[K");
        assert_eq!(buffer.lines(), ["abc"]);
        let buffer = render("abcdef\x1b[3D\x1b[1K");
        assert_eq!(buffer.lines(), ["   def"]);
        let buffer = render("abcdef\x1b[2K");
        assert_eq!(buffer.lines(), [""]);
        assert_eq!(buffer.cursor().col, 0);
        assert_eq!(buffer.frames().len(), 1);
    }

    #[test]
    fn test_erase_in_display() {
        let buffer = render("one\ntwo\nthree\x1b[2A\x1b[2G\x1b[J");
        assert_eq!(buffer.lines(), ["o"]);
        assert_eq!(buffer.frames(), ["one\ntwo\nthree"]);

        let buffer = render("one\ntwo\nthree\x1b[A\x1b[2G\x1b[1J");
        assert_eq!(buffer.lines(), [" wo", "three"]);
        assert_eq!(buffer.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_unknown_erase_mode_ignored() {
        let buffer = render("ab\x1b[5J");
        assert_eq!(buffer.lines(), ["ab"]);
        assert!(buffer.frames().is_empty());
    }

    #[test]
    fn test_reset() {
        let buffer = render("ab\ncd\x1bc");
        assert_eq!(buffer.lines(), [""]);
        assert_eq!(buffer.frames(), ["ab\ncd"]);
    }

    #[test]
    fn test_ignored_codes() {
        let buffer = render("\x1b[31mred\x1b[0m\x1b]0;title\x07\x1b[?25l\x1b[2S");
        assert_eq!(buffer.lines(), ["red"]);
        assert!(buffer.frames().is_empty());
    }

    #[test]
    fn test_write_after_line_erase() {
        let mut buffer = render("abcdef\x1b[s");
        buffer.execute(BufferCommand::EraseLine(EraseMode::All));
        buffer.execute(BufferCommand::Text("x"));
        assert_eq!(buffer.lines(), ["x"]);
        assert_eq!(buffer.cursor().col, 1);
    }

    #[test]
    fn test_multibyte_columns() {
        let buffer = render("héllo\x1b[4DE");
        assert_eq!(buffer.lines(), ["hEllo"]);
    }

    #[test]
    fn test_from_control_codes() {
        let codes = parse("AB\x1b[2J", Mode::Raw);
        let snapshot = VirtualTerminalBuffer::from_control_codes(&codes);
        assert_eq!(snapshot.frames, ["AB"]);
        assert_eq!(snapshot.lines, [""]);
        assert_eq!(snapshot.cursor, Cursor::new());
        assert_eq!(snapshot.frames_with_current(), ["AB", ""]);
    }

    #[test]
    fn test_frames_with_current() {
        let buffer = render("one\x1b[2Ktwo");
        assert_eq!(buffer.frames_with_current(), ["one", "two"]);
    }
}
