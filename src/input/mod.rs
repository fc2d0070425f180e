//! Input decoding
//!
//! Terminal captures are bytes, not text. Valid UTF-8 is decoded as usual;
//! every byte that is not part of a valid UTF-8 sequence is mapped to the
//! code point of the same value. That keeps 8-bit C1 controls (0x80-0x9F)
//! recognizable as U+0080-U+009F, which is what the raw-mode tokenizer
//! looks for.

use std::io::{self, Read};
use std::path::Path;

/// Decode bytes into text, mapping invalid bytes to U+0000-U+00FF
pub fn decode(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        text.extend(chunk.invalid().iter().map(|&byte| char::from(byte)));
    }
    text
}

/// Read everything from `reader` and decode it
pub fn read_text(mut reader: impl Read) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode(&bytes))
}

/// Read and decode a file, or stdin when no path is given
pub fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => Ok(decode(&std::fs::read(path)?)),
        None => read_text(io::stdin().lock()),
    }
}
