//! [`DeviceSession`] over SSH.

use std::path::PathBuf;
use std::time::Duration;

use log::{error, info};
use tokio::runtime::Runtime;

use super::DeviceSession;
use crate::driver::{GenericDriver, Response};
use crate::error::SessionError;
use crate::inventory::Device;
use crate::platform::PlatformRegistry;
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig};

/// How to reach a device beyond what the inventory says.
#[derive(Debug)]
pub struct ConnectOptions {
    pub port: u16,
    pub timeout: Duration,
    pub auth: AuthMethod,
    pub host_key_verification: HostKeyVerification,
    pub known_hosts_path: Option<PathBuf>,
}

/// Blocking device session backed by the async [`GenericDriver`].
///
/// The driver runs on a private single-worker runtime so russh keepalives
/// keep flowing while the caller blocks on operator input.
pub struct SshSession {
    runtime: Runtime,
    driver: GenericDriver,
}

impl SshSession {
    /// Resolve the platform for `device`, connect and log in.
    pub fn connect(device: &Device, options: ConnectOptions) -> Result<Self, SessionError> {
        let registry = PlatformRegistry::with_builtins();
        let Some(platform) = registry.get(&device.device_type).cloned() else {
            error!(
                "No platform for device_type '{}'; known: {}",
                device.device_type,
                registry.names().join(", ")
            );
            return Err(SessionError::UnknownPlatform {
                name: device.device_type.clone(),
            });
        };

        let mut ssh_config = SshConfig::new(&device.ip, &device.username, options.auth);
        ssh_config.port = options.port;
        ssh_config.timeout = options.timeout;
        ssh_config.terminal_width = platform.terminal_width;
        ssh_config.terminal_height = platform.terminal_height;
        ssh_config.host_key_verification = options.host_key_verification;
        ssh_config.known_hosts_path = options.known_hosts_path;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(SessionError::Runtime)?;

        let mut driver = GenericDriver::new(ssh_config, platform)?;
        if let Err(e) = runtime.block_on(driver.open()) {
            error!("Failed connecting to {}: {}", device.ip, e);
            // Tear down whatever part of the connection came up
            let _ = runtime.block_on(driver.close());
            return Err(e);
        }

        info!("Connected to {} ({})", device.name, device.ip);
        Ok(Self { runtime, driver })
    }
}

/// A response carrying a device failure message becomes an error.
fn ensure_accepted(response: &Response) -> Result<(), SessionError> {
    match &response.failure_message {
        Some(message) => Err(SessionError::CommandFailed {
            command: response.command.clone(),
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

/// Combined raw output of a config push, or the first rejection.
fn config_output(responses: &[Response]) -> Result<String, SessionError> {
    responses.iter().try_for_each(ensure_accepted)?;
    Ok(responses
        .iter()
        .map(|r| r.raw_result.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}

impl DeviceSession for SshSession {
    fn push_config(&mut self, commands: &[String]) -> Result<String, SessionError> {
        let responses = self.runtime.block_on(self.driver.send_config(commands))?;
        config_output(&responses)
    }

    fn exec_command(&mut self, command: &str) -> Result<String, SessionError> {
        let response = self.runtime.block_on(self.driver.send_command(command))?;
        ensure_accepted(&response)?;
        Ok(response.result)
    }

    fn close(&mut self) -> Result<(), SessionError> {
        self.runtime.block_on(self.driver.close())
    }
}
