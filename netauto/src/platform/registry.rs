//! Lookup of platform definitions by inventory `device_type`.

use std::collections::HashMap;

use super::definition::PlatformDefinition;
use super::vendors;

/// Known platforms, keyed by every accepted `device_type` spelling.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in platforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        let ios = vendors::cisco_ios::platform();
        for alias in ["cisco_xe", "cisco_ios_ssh"] {
            registry.register_as(alias, ios.clone());
        }
        registry.register(ios);
        registry.register(vendors::arista_eos::platform());
        registry
    }

    /// Register under the platform's own name, replacing any previous entry.
    pub fn register(&mut self, platform: PlatformDefinition) {
        self.platforms.insert(platform.name.clone(), platform);
    }

    /// Register under an alternate name.
    pub fn register_as(&mut self, name: impl Into<String>, platform: PlatformDefinition) {
        self.platforms.insert(name.into(), platform);
    }

    /// Look up a platform; names are matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(&name.trim().to_ascii_lowercase())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.platforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_and_aliases() {
        let registry = PlatformRegistry::with_builtins();
        assert_eq!(registry.get("cisco_ios").unwrap().name, "cisco_ios");
        assert_eq!(registry.get("cisco_xe").unwrap().name, "cisco_ios");
        assert_eq!(registry.get(" Cisco_IOS ").unwrap().name, "cisco_ios");
        assert_eq!(registry.get("arista_eos").unwrap().name, "arista_eos");
        assert!(registry.get("juniper_junos").is_none());
        assert_eq!(
            registry.names(),
            vec!["arista_eos", "cisco_ios", "cisco_ios_ssh", "cisco_xe"]
        );
    }
}
