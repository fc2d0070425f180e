//! Buffer snapshots
//!
//! A snapshot captures the final buffer, the frames captured before each
//! erase and the cursor, in a serializable form. Replaying the same control
//! codes always produces the same snapshot.

use serde::{Deserialize, Serialize};

use super::cursor::Cursor;

/// Result of replaying control codes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Final buffer lines
    pub lines: Vec<String>,
    /// Buffer text captured right before each erase, oldest first
    pub frames: Vec<String>,
    /// Final cursor position
    pub cursor: Cursor,
}

impl Snapshot {
    /// Final buffer as one string
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Every screen state: the captured frames followed by the final buffer
    pub fn frames_with_current(&self) -> Vec<String> {
        let mut frames = self.frames.clone();
        frames.push(self.text());
        frames
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Human-readable dump of frames, final buffer and cursor (for debugging)
    pub fn to_text(&self) -> String {
        let mut result = String::new();

        for (index, frame) in self.frames.iter().enumerate() {
            result.push_str(&format!("--- frame {} ---\n", index + 1));
            result.push_str(frame);
            result.push('\n');
        }

        result.push_str("--- buffer ---\n");
        result.push_str(&self.text());
        result.push('\n');
        result.push_str(&format!(
            "--- cursor {},{} ---\n",
            self.cursor.col, self.cursor.row
        ));
        result
    }
}
