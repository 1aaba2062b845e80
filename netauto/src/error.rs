//! Error types for netauto.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for netauto operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Device session errors (connect, push, exec).
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Inventory loading errors.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Backup persistence errors.
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Device selection failed (unknown name on the command line).
    #[error("Device '{name}' not found in inventory")]
    UnknownDevice { name: String },

    /// The operator's input stream was closed while a prompt was waiting.
    #[error("Operator input closed")]
    InputClosed,

    /// Console I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The single error kind surfaced by a device session.
///
/// Every failure a session can produce (transport, channel, device-reported)
/// arrives as one of these so callers can treat them uniformly.
#[derive(Error, Debug)]
pub enum SessionError {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// PTY channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session not connected
    #[error("Session not connected")]
    NotConnected,

    /// The device rejected a command
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// No platform definition for the device type
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },

    /// Prompt did not match any privilege level
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// Could not reach the target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Async runtime could not be created
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key differs from the recorded one
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host not present in known_hosts under strict checking
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Channel layer errors (pattern matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid prompt regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Inventory loading errors.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Device inventory not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Inventory file is empty")]
    Empty,

    #[error("Inventory file must contain a mapping with a 'devices' list")]
    NotAMapping,

    #[error("Inventory file must define a 'devices' list")]
    MissingDevices,

    #[error("No devices found in the inventory")]
    NoDevices,
}

/// Backup persistence errors.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Unable to create backup directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to write backup {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using netauto's Error.
pub type Result<T> = std::result::Result<T, Error>;
