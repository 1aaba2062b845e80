//! Arista EOS platform definition.
//!
//! Prompt shapes match IOS closely; EOS also allows spaces and parentheses
//! in the hostname part and has named config sessions (`(config-s-...)`),
//! which are not used here.

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Create the Arista EOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-@()/: ]{1,63}> ?$").unwrap();

    let privilege_exec = PrivilegeLevel::new("privilege_exec", r"(?mi)^[\w.\-@()/: ]{1,63}# ?$")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth(r"(?mi)^password: ?$")
        .unwrap()
        .with_not_contains("(config");

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-@()/: ]{1,63}\(config[\w.\-@/:+]{0,63}\)# ?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal")
    .with_deescalate("end")
    .with_not_contains("(config-s-");

    PlatformDefinition::new("arista_eos")
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_default_privilege("privilege_exec")
        .with_config_privilege("configuration")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Error")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Unavailable command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 32767")
        .with_terminal_size(32767, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_matching() {
        let platform = platform();
        let privileged = &platform.privilege_levels["privilege_exec"];
        let config = &platform.privilege_levels["configuration"];

        assert!(privileged.matches("switch#"));
        assert!(!privileged.matches("switch(config)#"));
        assert!(config.matches("switch(config-if-Et1)#"));
        assert!(!config.matches("switch(config-s-mysess)#"));
    }

    #[test]
    fn test_on_open_commands() {
        let platform = platform();
        assert_eq!(
            platform.on_open_commands,
            vec!["terminal length 0", "terminal width 32767"]
        );
    }
}
