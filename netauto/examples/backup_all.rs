//! Back up the running-config of every device in an inventory.
//!
//! Non-interactive use of the library: no menu, one SSH session per device,
//! each closed by its guard before the next device is tried.
//!
//! # Usage
//!
//! ```bash
//! NETAUTO_PASSWORD=secret cargo run --example backup_all -- devices.yaml backups
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use secrecy::SecretString;

use netauto::backup::write_backup;
use netauto::commands::SHOW_RUNNING_CONFIG;
use netauto::inventory::load_devices;
use netauto::{
    AuthMethod, ConnectOptions, Device, DeviceSession, HostKeyVerification, SessionGuard,
    SshSession,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let inventory = PathBuf::from(args.next().unwrap_or_else(|| "devices.yaml".to_string()));
    let backups_dir = PathBuf::from(args.next().unwrap_or_else(|| "backups".to_string()));
    let password = std::env::var("NETAUTO_PASSWORD")?;

    let devices = load_devices(&inventory)?;
    println!("Backing up {} device(s) into {}", devices.len(), backups_dir.display());

    let mut failed = 0;
    for device in &devices {
        let options = ConnectOptions {
            port: 22,
            timeout: Duration::from_secs(30),
            auth: AuthMethod::Password(SecretString::from(password.clone())),
            host_key_verification: HostKeyVerification::AcceptNew,
            known_hosts_path: None,
        };

        let result = backup_one(device, options, &backups_dir);

        match result {
            Ok(path) => println!("  {device}: {}", path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("  {device}: {e}");
            }
        }
    }

    println!("Done, {} ok, {} failed", devices.len() - failed, failed);
    Ok(())
}

fn backup_one(
    device: &Device,
    options: ConnectOptions,
    backups_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut session = SessionGuard::new(SshSession::connect(device, options)?);
    let config = session.exec_command(SHOW_RUNNING_CONFIG)?;
    Ok(write_backup(&config, &device.name, backups_dir, Utc::now())?)
}
