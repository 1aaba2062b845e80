//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys.
    Strict,

    /// Learn unknown keys, reject changed ones.
    #[default]
    AcceptNew,

    /// Accept every key. Lab use only.
    Disabled,
}

/// Authentication method for SSH connections.
#[derive(Debug)]
pub enum AuthMethod {
    /// Password authentication. The same secret answers an enable prompt.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        path: PathBuf,
        passphrase: Option<SecretString>,
    },
}

/// SSH connection configuration.
#[derive(Debug)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port.
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Connect timeout, also used for every prompt read.
    pub timeout: Duration,

    /// Terminal width for the PTY.
    pub terminal_width: u32,

    /// Terminal height for the PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Alternate known_hosts file.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Configuration with the usual defaults: port 22, 30s timeout, 511x24 PTY.
    pub fn new(host: impl Into<String>, username: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            auth,
            timeout: Duration::from_secs(30),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }
}
