//! Cisco IOS / IOS-XE platform definition.
//!
//! ```text
//! R1>                     exec
//! R1#                     privilege_exec
//! R1(config)#             configuration
//! R1(config-if)#          configuration (sub-mode)
//! R1(config-router)#      configuration (sub-mode)
//! ```

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-@/:]{1,63}> ?$").unwrap();

    let privilege_exec = PrivilegeLevel::new("privilege_exec", r"(?mi)^[\w.\-@/:]{1,63}# ?$")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth(r"(?mi)^password: ?$")
        .unwrap()
        .with_not_contains("(conf");

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-@/:]{1,63}\(conf[\w.\-@/:+]{0,63}\)# ?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal")
    .with_deescalate("end");

    PlatformDefinition::new("cisco_ios")
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_default_privilege("privilege_exec")
        .with_config_privilege("configuration")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input detected")
        .with_failure_pattern("% Unknown command")
        .with_failure_pattern("% Bad mask")
        .with_failure_pattern("% Unrecognized host")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let platform = platform();
        assert_eq!(platform.name, "cisco_ios");
        let names: Vec<&str> = platform.privilege_levels.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["exec", "privilege_exec", "configuration"]);
        assert_eq!(platform.default_privilege, "privilege_exec");
        assert_eq!(platform.config_privilege, "configuration");
    }

    #[test]
    fn test_prompt_matching() {
        let platform = platform();
        let exec = &platform.privilege_levels["exec"];
        let privileged = &platform.privilege_levels["privilege_exec"];
        let config = &platform.privilege_levels["configuration"];

        assert!(exec.matches("R1>"));
        assert!(!exec.matches("R1#"));

        assert!(privileged.matches("R1#"));
        assert!(privileged.matches("core-sw.lab#"));
        assert!(!privileged.matches("R1(config)#"));

        assert!(config.matches("R1(config)#"));
        assert!(config.matches("R1(config-if)#"));
        assert!(config.matches("R1(config-router)#"));
        assert!(!config.matches("R1#"));
    }

    #[test]
    fn test_combined_prompt_finds_prompt_after_output() {
        let pattern = platform().prompt_pattern().unwrap();
        assert!(pattern.is_match(b"Interface  IP-Address\nGi0/0  10.0.0.1\nR1#"));
        assert!(pattern.is_match(b"Enter configuration commands.\nR1(config)#"));
        assert!(!pattern.is_match(b"Building configuration...\n"));
    }

    #[test]
    fn test_failure_detection() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("         ^\n% Invalid input detected at '^' marker."),
            Some("% Invalid input detected")
        );
        assert_eq!(platform.detect_failure("Success rate is 100 percent (5/5)"), None);
    }
}
