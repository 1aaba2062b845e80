//! Platform definition for vendor-specific CLI behaviour.

use indexmap::IndexMap;
use regex::bytes::Regex;

use super::privilege_level::PrivilegeLevel;

/// Everything the driver needs to know about one CLI dialect.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g. "cisco_ios").
    pub name: String,

    /// Privilege levels in match order.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// Level to settle in after login; exec commands run here.
    pub default_privilege: String,

    /// Level that configuration pushes run in.
    pub config_privilege: String,

    /// Output substrings that mark a command as rejected.
    pub failed_when_contains: Vec<String>,

    /// Commands run once after login (paging, width).
    pub on_open_commands: Vec<String>,

    /// Terminal width for the PTY.
    pub terminal_width: u32,

    /// Terminal height for the PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            default_privilege: String::new(),
            config_privilege: String::new(),
            failed_when_contains: vec![],
            on_open_commands: vec![],
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.name.clone(), level);
        self
    }

    pub fn with_default_privilege(mut self, name: impl Into<String>) -> Self {
        self.default_privilege = name.into();
        self
    }

    pub fn with_config_privilege(mut self, name: impl Into<String>) -> Self {
        self.config_privilege = name.into();
        self
    }

    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Single pattern matching the prompt of any privilege level.
    pub fn prompt_pattern(&self) -> Result<Regex, regex::Error> {
        let combined = self
            .privilege_levels
            .values()
            .map(|level| format!("(?:{})", level.pattern.as_str()))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&combined)
    }

    /// First failure substring present in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .map(String::as_str)
            .find(|pattern| output.contains(pattern))
    }
}
