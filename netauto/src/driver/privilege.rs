//! Privilege level tracking and navigation.

use indexmap::IndexMap;

use crate::error::SessionError;
use crate::platform::PrivilegeLevel;

/// Tracks the current privilege level and plans moves between levels.
#[derive(Debug)]
pub struct PrivilegeManager {
    levels: IndexMap<String, PrivilegeLevel>,
    current: Option<String>,
}

impl PrivilegeManager {
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        Self {
            levels,
            current: None,
        }
    }

    /// First level (in definition order) whose pattern accepts `prompt`.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel, SessionError> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| SessionError::UnknownPrivilege {
                prompt: prompt.to_string(),
            })
    }

    /// Record the level that `prompt` belongs to.
    pub fn update_from_prompt(&mut self, prompt: &str) -> Result<&str, SessionError> {
        let name = self.determine_from_prompt(prompt)?.name.clone();
        Ok(self.current.insert(name).as_str())
    }

    pub fn current(&self) -> Option<&PrivilegeLevel> {
        self.current.as_ref().and_then(|name| self.levels.get(name))
    }

    /// `name` followed by its ancestors up to the root.
    fn lineage(&self, name: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut next = self.levels.get(name);
        while let Some(level) = next {
            // Guard against a cyclic definition
            if chain.contains(&level.name.as_str()) {
                break;
            }
            chain.push(level.name.as_str());
            next = level.parent.as_deref().and_then(|p| self.levels.get(p));
        }
        chain
    }

    /// Levels to walk through from `from` to `to`, both included.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>, SessionError> {
        let up = self.lineage(from);
        let down = self.lineage(to);

        let unreachable = || SessionError::PrivilegeAcquisitionFailed {
            target: to.to_string(),
        };

        // Climb from `from` to the first shared ancestor, then descend to `to`
        let (up_idx, down_idx) = up
            .iter()
            .enumerate()
            .find_map(|(i, name)| down.iter().position(|d| d == name).map(|j| (i, j)))
            .ok_or_else(unreachable)?;

        let mut path: Vec<String> = up[..=up_idx].iter().map(|s| s.to_string()).collect();
        path.extend(down[..down_idx].iter().rev().map(|s| s.to_string()));
        Ok(path)
    }

    /// Command for one step between adjacent levels, plus its password prompt.
    pub fn transition(&self, from: &str, to: &str) -> Option<(&str, Option<&regex::bytes::Regex>)> {
        let from_level = self.levels.get(from)?;
        let to_level = self.levels.get(to)?;

        if to_level.parent.as_deref() == Some(from) {
            return Some((
                to_level.escalate_command.as_deref()?,
                to_level.escalate_prompt.as_ref(),
            ));
        }

        if from_level.parent.as_deref() == Some(to) {
            return Some((from_level.deescalate_command.as_deref()?, None));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_levels() -> IndexMap<String, PrivilegeLevel> {
        let user = PrivilegeLevel::new("user", r">\s*$").unwrap();

        let privileged = PrivilegeLevel::new("privileged", r"#\s*$")
            .unwrap()
            .with_parent("user")
            .with_escalate("enable")
            .with_deescalate("disable")
            .with_auth(r"[Pp]assword:\s*$")
            .unwrap()
            .with_not_contains("(config");

        let configuration = PrivilegeLevel::new("configuration", r"\(config[^)]*\)#\s*$")
            .unwrap()
            .with_parent("privileged")
            .with_escalate("configure terminal")
            .with_deescalate("end");

        let mut levels = IndexMap::new();
        for level in [user, privileged, configuration] {
            levels.insert(level.name.clone(), level);
        }
        levels
    }

    #[test]
    fn test_determine_privilege() {
        let manager = PrivilegeManager::new(make_test_levels());
        assert_eq!(manager.determine_from_prompt("router>").unwrap().name, "user");
        assert_eq!(manager.determine_from_prompt("router#").unwrap().name, "privileged");
        assert_eq!(
            manager.determine_from_prompt("router(config-if)#").unwrap().name,
            "configuration"
        );
        assert!(manager.determine_from_prompt("login:").is_err());
    }

    #[test]
    fn test_update_tracks_current() {
        let mut manager = PrivilegeManager::new(make_test_levels());
        assert!(manager.current().is_none());
        assert_eq!(manager.update_from_prompt("router(config)#").unwrap(), "configuration");
        assert_eq!(manager.current().unwrap().name, "configuration");
    }

    #[test]
    fn test_find_path() {
        let manager = PrivilegeManager::new(make_test_levels());
        assert_eq!(
            manager.find_path("user", "configuration").unwrap(),
            vec!["user", "privileged", "configuration"]
        );
        assert_eq!(
            manager.find_path("configuration", "user").unwrap(),
            vec!["configuration", "privileged", "user"]
        );
        assert_eq!(manager.find_path("privileged", "privileged").unwrap(), vec!["privileged"]);
        assert!(manager.find_path("user", "shell").is_err());
    }

    #[test]
    fn test_transition() {
        let manager = PrivilegeManager::new(make_test_levels());

        let (command, auth) = manager.transition("user", "privileged").unwrap();
        assert_eq!(command, "enable");
        assert!(auth.is_some());

        let (command, auth) = manager.transition("configuration", "privileged").unwrap();
        assert_eq!(command, "end");
        assert!(auth.is_none());

        assert!(manager.transition("user", "configuration").is_none());
    }
}
