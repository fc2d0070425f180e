//! Render sink
//!
//! [`RenderStream`] collects whatever is written to it, as a terminal
//! would, and replays it on demand.

use std::io;

use super::render;
use super::snapshot::Snapshot;
use crate::input::decode;
use crate::parser::Mode;

/// `io::Write` sink that renders everything written so far
#[derive(Debug, Clone, Default)]
pub struct RenderStream {
    bytes: Vec<u8>,
    mode: Option<Mode>,
}

impl RenderStream {
    /// Create a sink that detects the input mode when rendering
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink with a fixed input mode
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            bytes: Vec::new(),
            mode: Some(mode),
        }
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Everything written so far, decoded
    pub fn text(&self) -> String {
        decode(&self.bytes)
    }

    /// Replay everything written so far on a fresh buffer
    pub fn render(&self) -> Snapshot {
        let text = self.text();
        let mode = self.mode.unwrap_or_else(|| Mode::detect(&text));
        render(&text, mode)
    }

    /// Discard everything written
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl io::Write for RenderStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
