//! Cursor position in buffer coordinates
//!
//! Columns count characters from the start of a line, rows index the
//! buffer's lines. Both are 0-indexed. The buffer supplies the bounds, so
//! every movement helper here clamps.

use serde::{Deserialize, Serialize};

/// Cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Column (0-indexed, in characters)
    pub col: usize,
    /// Row (0-indexed line number)
    pub row: usize,
}

impl Cursor {
    /// Create a cursor at the home position
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cursor at the given position
    pub fn at(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Move up by n rows, stopping at the first line
    pub fn move_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
    }

    /// Move down by n rows, stopping at `last_row`
    pub fn move_down(&mut self, n: usize, last_row: usize) {
        self.row = self.row.saturating_add(n).min(last_row);
    }

    /// Move left by n columns, stopping at column 0
    pub fn move_left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
    }

    /// Move right by n columns, stopping at `max_col`
    pub fn move_right(&mut self, n: usize, max_col: usize) {
        self.col = self.col.saturating_add(n).min(max_col);
    }

    /// Carriage return - move to column 0
    pub fn carriage_return(&mut self) {
        self.col = 0;
    }

    /// Clamp the row into `0..rows`
    pub fn clamp_row(&mut self, rows: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
    }

    /// Clamp the column into `0..=width`
    pub fn clamp_col(&mut self, width: usize) {
        self.col = self.col.min(width);
    }
}
