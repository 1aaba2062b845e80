//! Channel layer for prompt matching over a PTY shell.

mod buffer;
mod pty;

pub use buffer::PatternBuffer;
pub use pty::PtyChannel;
