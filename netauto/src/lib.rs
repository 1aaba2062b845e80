//! # netauto
//!
//! Interactive SSH tool for day-to-day network device operations.
//!
//! The operator picks a device from a YAML inventory, logs in once and then
//! drives a numbered menu:
//!
//! - configure an interface address
//! - show the interface summary
//! - ping from the device
//! - back up the running configuration to a timestamped file
//! - configure a single-area OSPF process
//!
//! Operator input is validated and normalised before anything is sent, so
//! the device only ever sees well-formed commands.
//!
//! ## Layout
//!
//! The interactive core ([`menu`], [`operations`], [`fields`], [`commands`],
//! [`backup`]) is synchronous and talks to devices through the
//! [`DeviceSession`] trait. [`SshSession`] implements it on top of an async
//! russh stack ([`transport`], [`channel`], [`platform`], [`driver`]).
//!
//! ```rust,no_run
//! use netauto::console::Console;
//! use netauto::menu::{MenuContext, run_menu};
//! use netauto::{ConnectOptions, SessionGuard, SshSession};
//! # fn demo(device: &netauto::Device, options: ConnectOptions, context: MenuContext) -> netauto::Result<()> {
//! let mut session = SessionGuard::new(SshSession::connect(device, options)?);
//! run_menu(&mut Console::stdio(), &mut *session, &context)?;
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod channel;
pub mod commands;
pub mod console;
pub mod driver;
pub mod error;
pub mod fields;
pub mod inventory;
pub mod logging;
pub mod menu;
pub mod operations;
pub mod platform;
pub mod session;
pub mod settings;
pub mod transport;

// Re-export main types for convenience
pub use error::{Error, Result, SessionError};
pub use inventory::Device;
pub use session::{ConnectOptions, DeviceSession, SessionGuard, SshSession};
pub use settings::Settings;
pub use transport::{AuthMethod, HostKeyVerification};
