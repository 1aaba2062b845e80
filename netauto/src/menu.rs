//! Interactive menu loop.

use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;

use log::{info, warn};

use crate::console::Console;
use crate::error::{Error, Result};
use crate::operations;
use crate::session::DeviceSession;

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Exit,
    ConfigureInterface,
    ShowInterfaces,
    PingTest,
    BackupConfig,
    ConfigureOspf,
}

impl MenuOption {
    /// Parse an operator selection. Only the exact digits `0` to `5` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(Self::Exit),
            "1" => Some(Self::ConfigureInterface),
            "2" => Some(Self::ShowInterfaces),
            "3" => Some(Self::PingTest),
            "4" => Some(Self::BackupConfig),
            "5" => Some(Self::ConfigureOspf),
            _ => None,
        }
    }
}

const MENU: &str = "\n=== Network Automation Menu ===
1) Configure interface
2) Show interface status
3) Test ping
4) Backup running config
5) Configure OSPF
0) Exit";

/// Values the operations need besides the console and session.
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub hostname: String,
    pub backups_dir: PathBuf,
    pub default_ping_count: NonZeroU32,
}

/// Run the menu until the operator exits or input closes.
///
/// The session is borrowed for the whole loop and never opened or closed here.
pub fn run_menu<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
    context: &MenuContext,
) -> Result<()> {
    loop {
        match dispatch(console, session, context) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(Error::InputClosed) => {
                info!("Operator input closed; leaving menu");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
}

/// Show the menu and run one selection. Returns `false` once the operator exits.
fn dispatch<R: BufRead, W: Write, S: DeviceSession>(
    console: &mut Console<R, W>,
    session: &mut S,
    context: &MenuContext,
) -> Result<bool> {
    console.say(MENU)?;
    let choice = console.prompt("Select an option: ")?;

    let Some(option) = MenuOption::parse(&choice) else {
        warn!("Invalid menu selection: {:?}", choice);
        console.say("Invalid choice. Please try again.")?;
        return Ok(true);
    };

    info!("Menu selection: {:?}", option);
    match option {
        MenuOption::Exit => {
            console.say("Goodbye!")?;
            info!("Operator exited via menu");
            return Ok(false);
        }
        MenuOption::ConfigureInterface => operations::configure_interface(console, session)?,
        MenuOption::ShowInterfaces => operations::show_interfaces(console, session)?,
        MenuOption::PingTest => {
            operations::ping_test(console, session, context.default_ping_count)?
        }
        MenuOption::BackupConfig => operations::backup_config(
            console,
            session,
            &context.hostname,
            &context.backups_dir,
        )?,
        MenuOption::ConfigureOspf => operations::configure_ospf(console, session)?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{printed, scripted};
    use crate::session::tests::RecordingSession;

    fn context(dir: &std::path::Path) -> MenuContext {
        MenuContext {
            hostname: "R1".to_string(),
            backups_dir: dir.to_path_buf(),
            default_ping_count: NonZeroU32::new(5).unwrap(),
        }
    }

    #[test]
    fn test_parse_options() {
        assert_eq!(MenuOption::parse("0"), Some(MenuOption::Exit));
        assert_eq!(MenuOption::parse(" 3 "), Some(MenuOption::PingTest));
        assert_eq!(MenuOption::parse("5"), Some(MenuOption::ConfigureOspf));
        assert_eq!(MenuOption::parse("6"), None);
        assert_eq!(MenuOption::parse("01"), None);
        assert_eq!(MenuOption::parse(""), None);
    }

    #[test]
    fn test_invalid_then_valid_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let mut console = scripted(&["9", "2", "0"]);
        let mut session = RecordingSession::replying("Gi0/0 up");

        run_menu(&mut console, &mut session, &context(tmp.path())).unwrap();

        assert_eq!(session.executed, vec!["show ip interface brief"]);
        let out = printed(&console);
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 1);
        assert_eq!(out.matches("=== Network Automation Menu ===").count(), 3);
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(session.closes, 0);
    }

    #[test]
    fn test_session_failure_keeps_looping() {
        let tmp = tempfile::tempdir().unwrap();
        let mut console = scripted(&["4", "2", "0"]);
        let mut session = RecordingSession::failing();

        run_menu(&mut console, &mut session, &context(tmp.path())).unwrap();

        assert_eq!(
            session.executed,
            vec!["show running-config", "show ip interface brief"]
        );
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
        let out = printed(&console);
        assert!(out.contains("An error occurred while performing running-config capture."));
        assert!(out.contains("An error occurred while performing interface summary."));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_closed_input_ends_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let mut console = scripted(&["3"]);
        let mut session = RecordingSession::default();

        run_menu(&mut console, &mut session, &context(tmp.path())).unwrap();

        assert!(session.executed.is_empty());
        assert!(!printed(&console).contains("Goodbye!"));
    }
}
