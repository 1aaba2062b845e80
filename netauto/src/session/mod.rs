//! Device session abstraction.
//!
//! The operations only ever talk to a device through [`DeviceSession`]. The
//! SSH implementation lives in [`ssh`]; tests use an in-memory recorder.

mod ssh;

pub use ssh::{ConnectOptions, SshSession};

use std::ops::{Deref, DerefMut};

use log::{debug, warn};

use crate::error::SessionError;

/// A live management channel to one device.
pub trait DeviceSession {
    /// Send configuration-mode commands as one unit.
    ///
    /// The session enters configuration mode, sends every command in order
    /// and leaves configuration mode again, returning the combined output.
    fn push_config(&mut self, commands: &[String]) -> Result<String, SessionError>;

    /// Run a single exec-mode command and return its output.
    fn exec_command(&mut self, command: &str) -> Result<String, SessionError>;

    /// Close the session.
    fn close(&mut self) -> Result<(), SessionError>;
}

impl<S: DeviceSession + ?Sized> DeviceSession for &mut S {
    fn push_config(&mut self, commands: &[String]) -> Result<String, SessionError> {
        (**self).push_config(commands)
    }

    fn exec_command(&mut self, command: &str) -> Result<String, SessionError> {
        (**self).exec_command(command)
    }

    fn close(&mut self) -> Result<(), SessionError> {
        (**self).close()
    }
}

/// Owns a session and closes it exactly once when dropped.
///
/// A failure while closing is logged and otherwise ignored.
pub struct SessionGuard<S: DeviceSession> {
    session: S,
}

impl<S: DeviceSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: DeviceSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: DeviceSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: DeviceSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        match self.session.close() {
            Ok(()) => debug!("Session closed"),
            Err(e) => warn!("Ignoring error while closing session: {}", e),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Scripted session that records every call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSession {
        pub pushed: Vec<Vec<String>>,
        pub executed: Vec<String>,
        pub closes: usize,
        pub fail_calls: bool,
        pub fail_close: bool,
        pub reply: String,
    }

    impl RecordingSession {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_calls: true,
                ..Default::default()
            }
        }

        fn outcome(&self, command: &str) -> Result<String, SessionError> {
            if self.fail_calls {
                Err(SessionError::CommandFailed {
                    command: command.to_string(),
                    message: "% Invalid input detected".to_string(),
                })
            } else {
                Ok(self.reply.clone())
            }
        }
    }

    impl DeviceSession for RecordingSession {
        fn push_config(&mut self, commands: &[String]) -> Result<String, SessionError> {
            self.pushed.push(commands.to_vec());
            self.outcome(commands.first().map(String::as_str).unwrap_or_default())
        }

        fn exec_command(&mut self, command: &str) -> Result<String, SessionError> {
            self.executed.push(command.to_string());
            self.outcome(command)
        }

        fn close(&mut self) -> Result<(), SessionError> {
            self.closes += 1;
            if self.fail_close {
                Err(SessionError::NotConnected)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_guard_closes_once_on_drop() {
        let mut session = RecordingSession::default();
        {
            let mut guard = SessionGuard::new(&mut session);
            guard.exec_command("show clock").unwrap();
        }
        assert_eq!(session.closes, 1);
        assert_eq!(session.executed, vec!["show clock"]);
    }

    #[test]
    fn test_guard_swallows_close_failure() {
        let mut session = RecordingSession {
            fail_close: true,
            ..Default::default()
        };
        drop(SessionGuard::new(&mut session));
        assert_eq!(session.closes, 1);
    }
}
