//! High-level async driver for device interaction.
//!
//! The driver sends commands over a PTY shell, detects prompts, and moves
//! between privilege levels for configuration pushes.

mod generic;
mod privilege;
mod response;

pub use generic::GenericDriver;
pub use privilege::PrivilegeManager;
pub use response::Response;
