//! Platform definitions for multi-vendor support.
//!
//! A platform describes a CLI dialect: prompt patterns per privilege level,
//! how to move between levels, and which output means a command failed.

mod definition;
mod privilege_level;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use privilege_level::PrivilegeLevel;
pub use registry::PlatformRegistry;
