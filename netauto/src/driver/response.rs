//! Response type for command execution results.

use std::time::Duration;

/// Outcome of one command.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was sent.
    pub command: String,

    /// Output with the command echo and trailing prompt removed.
    pub result: String,

    /// Output as read, echo and prompt included.
    pub raw_result: String,

    /// Prompt that ended the output.
    pub prompt: String,

    /// Time from send to prompt.
    pub elapsed: Duration,

    /// Failure substring found in the output, if any.
    pub failure_message: Option<String>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}
