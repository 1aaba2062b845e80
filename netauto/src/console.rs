//! Operator-facing line I/O.
//!
//! Everything the operator sees or types goes through a [`Console`]. It is
//! passed explicitly to every component that talks to the operator, so tests
//! can drive the whole tool from an in-memory script.

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Line-oriented prompt/echo surface over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console from a reader and a writer.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `text` without a newline and read one trimmed line.
    ///
    /// Returns [`Error::InputClosed`] at end of input.
    pub fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Print one line.
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    /// Get a reference to the underlying writer.
    pub fn output(&self) -> &W {
        &self.output
    }
}
