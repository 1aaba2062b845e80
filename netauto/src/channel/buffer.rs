//! Output buffer with tail-only prompt search.
//!
//! Only the last `search_depth` bytes are searched for a prompt, which keeps
//! prompt detection cheap on very large outputs such as a full running
//! configuration.

use regex::bytes::{Match, Regex};
use vte::{Parser, Perform};

/// Collects printable output, dropping escape sequences and carriage returns.
#[derive(Default)]
struct Printable {
    out: Vec<u8>,
}

impl Perform for Printable {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\t') {
            self.out.push(byte);
        }
    }
}

/// Accumulated device output.
pub struct PatternBuffer {
    parser: Parser,
    printable: Printable,
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a buffer that searches the last `search_depth` bytes.
    pub fn new(search_depth: usize) -> Self {
        Self {
            parser: Parser::new(),
            printable: Printable::default(),
            search_depth,
        }
    }

    /// Append raw bytes from the device.
    ///
    /// The terminal parser keeps its state between calls, so an escape
    /// sequence split across two reads is still removed.
    pub fn extend(&mut self, data: &[u8]) {
        self.parser.advance(&mut self.printable, data);
    }

    /// Last match of `pattern` within the tail of the buffer.
    ///
    /// Offsets are relative to the start of the tail, not the buffer.
    pub fn search_tail(&self, pattern: &Regex) -> Option<Match<'_>> {
        pattern.find_iter(self.tail()).last()
    }

    fn tail(&self) -> &[u8] {
        let data = &self.printable.out;
        &data[data.len().saturating_sub(self.search_depth)..]
    }

    /// Take the contents, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.printable.out)
    }

    /// Drop everything read so far.
    pub fn clear(&mut self) {
        self.printable.out.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
