use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use secrecy::SecretString;

use netauto::console::Console;
use netauto::inventory::{choose_device, find_device, load_devices};
use netauto::menu::{MenuContext, run_menu};
use netauto::settings::load_env_file;
use netauto::{
    AuthMethod, ConnectOptions, Error, HostKeyVerification, SessionGuard, Settings, SshSession,
    logging,
};

/// Interactive network automation over SSH.
#[derive(Parser, Debug)]
#[command(name = "netauto", version, about)]
struct Args {
    /// Device inventory file
    #[arg(short, long, default_value = "devices.yaml")]
    inventory: PathBuf,

    /// Optional environment file with settings
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Device name to use instead of asking
    #[arg(short, long)]
    device: Option<String>,

    /// SSH port
    #[arg(short, long, default_value = "22")]
    port: u16,

    /// Per-read timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Private key file; skips the password prompt
    #[arg(short, long)]
    key: Option<PathBuf>,

    /// Passphrase for the private key
    #[arg(long, env = "NETAUTO_KEY_PASSPHRASE", hide_env_values = true, requires = "key")]
    key_passphrase: Option<String>,

    /// Host key checking mode
    #[arg(long, value_enum, default_value_t = HostKeyVerification::AcceptNew)]
    host_key: HostKeyVerification,

    /// known_hosts file (default ~/.ssh/known_hosts)
    #[arg(long)]
    known_hosts: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> netauto::Result<()> {
    if let Err(e) = load_env_file(&args.env_file) {
        eprintln!("Ignoring {}: {e}", args.env_file.display());
    }
    let settings = Settings::from_env();
    let log_path = logging::init(&settings.logs_dir, settings.log_level)?;
    for warning in &settings.warnings {
        warn!("{}", warning);
    }
    info!("Logging to {}", log_path.display());

    let mut console = Console::stdio();
    console.say("\n--- NetAuto CLI - Network Automation Tool ---")?;

    let devices = load_devices(&args.inventory)?;
    info!("Loaded {} device(s) from {}", devices.len(), args.inventory.display());

    let device = match &args.device {
        Some(name) => find_device(&devices, name)
            .ok_or_else(|| Error::UnknownDevice { name: name.clone() })?,
        None => choose_device(&mut console, &devices)?,
    };

    let auth = match args.key {
        Some(path) => AuthMethod::PrivateKey {
            path,
            passphrase: args.key_passphrase.map(SecretString::from),
        },
        None => {
            let password = rpassword::prompt_password(format!("Password for {}: ", device.username))?;
            AuthMethod::Password(SecretString::from(password))
        }
    };

    console.say(format!("Connecting to {} ({}) ...", device.name, device.ip))?;
    let options = ConnectOptions {
        port: args.port,
        timeout: Duration::from_secs(args.timeout),
        auth,
        host_key_verification: args.host_key,
        known_hosts_path: args.known_hosts,
    };
    let mut session = SessionGuard::new(SshSession::connect(device, options)?);
    console.say(format!("Connected to {}.", device.ip))?;

    let context = MenuContext {
        hostname: device.name.clone(),
        backups_dir: settings.backups_dir.clone(),
        default_ping_count: settings.default_ping_count,
    };
    run_menu(&mut console, &mut *session, &context)?;
    info!("Session with {} finished", device.name);
    Ok(())
}
