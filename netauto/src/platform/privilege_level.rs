//! Privilege level definition.

use regex::bytes::Regex;

/// One CLI mode of a device, recognised by its prompt.
///
/// Levels form a tree through `parent`: moving towards a child sends the
/// child's `escalate_command`, moving towards the parent sends the current
/// level's `deescalate_command`.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    /// Level name (e.g. "exec", "privilege_exec", "configuration").
    pub name: String,

    /// Prompt pattern for this level.
    pub pattern: Regex,

    /// Parent level, `None` for the root.
    pub parent: Option<String>,

    /// Command that enters this level from its parent.
    pub escalate_command: Option<String>,

    /// Command that leaves this level for its parent.
    pub deescalate_command: Option<String>,

    /// Password prompt that may follow `escalate_command`.
    pub escalate_prompt: Option<Regex>,

    /// Prompt substrings that rule this level out.
    pub not_contains: Vec<String>,
}

impl PrivilegeLevel {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            parent: None,
            escalate_command: None,
            deescalate_command: None,
            escalate_prompt: None,
            not_contains: vec![],
        })
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_escalate(mut self, command: impl Into<String>) -> Self {
        self.escalate_command = Some(command.into());
        self
    }

    pub fn with_deescalate(mut self, command: impl Into<String>) -> Self {
        self.deescalate_command = Some(command.into());
        self
    }

    /// Escalation may ask for a password matching `prompt_pattern`.
    pub fn with_auth(mut self, prompt_pattern: &str) -> Result<Self, regex::Error> {
        self.escalate_prompt = Some(Regex::new(prompt_pattern)?);
        Ok(self)
    }

    pub fn with_not_contains(mut self, pattern: impl Into<String>) -> Self {
        self.not_contains.push(pattern.into());
        self
    }

    /// Check whether a prompt belongs to this level.
    pub fn matches(&self, prompt: &str) -> bool {
        !self.not_contains.iter().any(|nc| prompt.contains(nc.as_str()))
            && self.pattern.is_match(prompt.as_bytes())
    }
}
