//! The five menu operations.
//!
//! Each operation collects validated fields from the operator, builds the
//! device commands and runs them over the session. A session failure is
//! logged, reported with a generic message and ends that operation only.

use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use std::path::Path;

use chrono::Utc;
use log::{error, info};

use crate::backup::write_backup;
use crate::commands;
use crate::console::Console;
use crate::error::{Result, SessionError};
use crate::fields;
use crate::session::DeviceSession;

fn report_failure<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    action: &str,
    err: &SessionError,
) -> Result<()> {
    error!("Failed during {}: {}", action, err);
    console.say(format!("An error occurred while performing {action}."))
}

/// Push `lines` and return the device output, or `None` after reporting a failure.
fn push<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
    action: &str,
    lines: &[String],
) -> Result<Option<String>> {
    info!("Pushing {} for {}: {:?}", lines.len(), action, lines);
    match session.push_config(lines) {
        Ok(output) => Ok(Some(output)),
        Err(e) => report_failure(console, action, &e).map(|()| None),
    }
}

fn exec<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
    action: &str,
    command: &str,
) -> Result<Option<String>> {
    info!("Running '{}' for {}", command, action);
    match session.exec_command(command) {
        Ok(output) => Ok(Some(output)),
        Err(e) => report_failure(console, action, &e).map(|()| None),
    }
}

/// Address an interface and enable it.
pub fn configure_interface<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
) -> Result<()> {
    let name = fields::prompt_interface_name(console)?;
    let ip = fields::prompt_ipv4(console, "IPv4 address: ")?;
    let mask = fields::prompt_subnet_mask(console, "Subnet mask (dotted decimal or /prefix): ")?;

    let lines = commands::interface_config(&name, ip, mask);
    if let Some(output) = push(console, session, "interface configuration", &lines)? {
        console.say(output)?;
        info!("Configured {} with {} {}", name, ip, mask);
    }
    Ok(())
}

/// Show the interface status summary.
pub fn show_interfaces<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
) -> Result<()> {
    if let Some(output) = exec(console, session, "interface summary", commands::SHOW_INTERFACES)? {
        console.say(output)?;
    }
    Ok(())
}

/// Ping a destination from the device.
pub fn ping_test<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
    default_count: NonZeroU32,
) -> Result<()> {
    let destination = fields::prompt_ipv4(console, "Destination IP: ")?;
    let count = fields::prompt_ping_count(console, default_count)?;

    let command = commands::ping(destination, count);
    if let Some(output) = exec(console, session, "ping test", &command)? {
        console.say(output)?;
    }
    Ok(())
}

/// Capture the running configuration and save it under `backups_dir`.
pub fn backup_config<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
    hostname: &str,
    backups_dir: &Path,
) -> Result<()> {
    let Some(config) = exec(
        console,
        session,
        "running-config capture",
        commands::SHOW_RUNNING_CONFIG,
    )?
    else {
        return Ok(());
    };

    match write_backup(&config, hostname, backups_dir, Utc::now()) {
        Ok(path) => console.say(format!("Saved running-config to {}", path.display())),
        Err(e) => {
            error!("Failed to save backup for {}: {}", hostname, e);
            console.say("An error occurred while saving the backup.")
        }
    }
}

/// Start an OSPF process and advertise one network.
pub fn configure_ospf<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
) -> Result<()> {
    let process_id = fields::prompt_positive_int(console, "OSPF process ID: ")?;
    let router_id = fields::prompt_ipv4(console, "Router ID (IPv4): ")?;
    let network = fields::prompt_ipv4(console, "Network address (A.B.C.D): ")?;
    let wildcard = fields::prompt_wildcard_mask(console, "Wildcard mask: ")?;
    let area = fields::prompt_area(console)?;

    let lines = commands::ospf_config(process_id, router_id, network, wildcard, &area);
    if let Some(output) = push(console, session, "OSPF configuration", &lines)? {
        console.say(output)?;
        info!("OSPF process {} configured, network {} area {}", process_id, network, area);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{printed, scripted};
    use crate::session::tests::RecordingSession;

    fn count(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_configure_interface_pushes_in_order() {
        let mut console = scripted(&["gi0/0", "10.0.0.1", "/24"]);
        let mut session = RecordingSession::replying("R1(config-if)#");

        configure_interface(&mut console, &mut session).unwrap();

        assert_eq!(
            session.pushed,
            vec![vec![
                "interface Gi0/0".to_string(),
                "ip address 10.0.0.1 255.255.255.0".to_string(),
                "no shutdown".to_string(),
            ]]
        );
        assert!(printed(&console).contains("R1(config-if)#"));
    }

    #[test]
    fn test_configure_interface_reprompts_bad_fields() {
        let mut console = scripted(&["gi0/0", "10.0.0.300", "10.0.0.1", "/33", "255.255.255.252"]);
        let mut session = RecordingSession::default();

        configure_interface(&mut console, &mut session).unwrap();

        assert_eq!(session.pushed[0][1], "ip address 10.0.0.1 255.255.255.252");
        let out = printed(&console);
        assert_eq!(out.matches("IPv4 address: ").count(), 2);
        assert_eq!(
            out.matches("Subnet mask (dotted decimal or /prefix): ").count(),
            2
        );
    }

    #[test]
    fn test_show_interfaces_prints_output() {
        let mut console = scripted(&[]);
        let mut session = RecordingSession::replying("GigabitEthernet0/0  10.0.0.1  YES manual up up");

        show_interfaces(&mut console, &mut session).unwrap();

        assert_eq!(session.executed, vec!["show ip interface brief"]);
        assert!(printed(&console).contains("GigabitEthernet0/0  10.0.0.1"));
    }

    #[test]
    fn test_ping_uses_default_count() {
        let mut console = scripted(&["8.8.8.8", ""]);
        let mut session = RecordingSession::replying("!!!!!");

        ping_test(&mut console, &mut session, count(5)).unwrap();

        assert_eq!(session.executed, vec!["ping 8.8.8.8 repeat 5"]);
        assert!(printed(&console).contains("Ping count [5]: "));
    }

    #[test]
    fn test_ping_invalid_count_falls_back() {
        let mut console = scripted(&["8.8.8.8", "0"]);
        let mut session = RecordingSession::default();

        ping_test(&mut console, &mut session, count(3)).unwrap();

        assert_eq!(session.executed, vec!["ping 8.8.8.8 repeat 3"]);
        assert!(printed(&console).contains("Invalid count. Using default."));
    }

    #[test]
    fn test_backup_writes_capture() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("backups");
        let mut console = scripted(&[]);
        let mut session = RecordingSession::replying("hostname R1\n!\nend");

        backup_config(&mut console, &mut session, "R1", &dir).unwrap();

        assert_eq!(session.executed, vec!["show running-config"]);
        let files: Vec<_> = std::fs::read_dir(&dir).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("R1_running_") && name.ends_with(".txt"));
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "hostname R1\n!\nend");
        assert!(printed(&console).contains("Saved running-config to "));
    }

    #[test]
    fn test_backup_session_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("backups");
        let mut console = scripted(&[]);
        let mut session = RecordingSession::failing();

        backup_config(&mut console, &mut session, "R1", &dir).unwrap();

        assert!(!dir.exists());
        assert!(
            printed(&console)
                .contains("An error occurred while performing running-config capture.")
        );
    }

    #[test]
    fn test_backup_write_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("backups");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut console = scripted(&[]);
        let mut session = RecordingSession::replying("hostname R1");

        backup_config(&mut console, &mut session, "R1", &blocker).unwrap();

        assert!(printed(&console).contains("An error occurred while saving the backup."));
    }

    #[test]
    fn test_configure_ospf_pushes_in_order() {
        let mut console = scripted(&["10", "1.1.1.1", "10.0.0.0", "0.0.0.255", "0"]);
        let mut session = RecordingSession::default();

        configure_ospf(&mut console, &mut session).unwrap();

        assert_eq!(
            session.pushed,
            vec![vec![
                "router ospf 10".to_string(),
                "router-id 1.1.1.1".to_string(),
                "network 10.0.0.0 0.0.0.255 area 0".to_string(),
            ]]
        );
    }

    #[test]
    fn test_push_failure_is_reported() {
        let mut console = scripted(&["1", "1.1.1.1", "10.0.0.0", "0.0.0.255", "0"]);
        let mut session = RecordingSession::failing();

        configure_ospf(&mut console, &mut session).unwrap();

        assert!(
            printed(&console).contains("An error occurred while performing OSPF configuration.")
        );
    }
}
