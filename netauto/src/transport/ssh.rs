//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use russh::Channel;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::error::TransportError;

/// Interval between keepalives while the operator sits in the menu.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// An authenticated SSH connection.
pub struct SshTransport {
    session: Handle<SshHandler>,
    terminal_width: u32,
    terminal_height: u32,
}

impl SshTransport {
    /// Connect to the SSH server and authenticate.
    pub async fn connect(config: &SshConfig) -> Result<Self, TransportError> {
        // Idle time at the menu is unbounded, so rely on keepalives rather
        // than an inactivity timeout.
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            keepalive_interval: Some(KEEPALIVE_INTERVAL),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification,
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("Connecting to {}:{}", config.host, config.port);
        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // Prefer the detailed host key failure over russh's generic one
            host_key_error
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .unwrap_or(TransportError::Ssh(e))
        })?;

        Self::authenticate(&mut session, config).await?;

        Ok(Self {
            session,
            terminal_width: config.terminal_width,
            terminal_height: config.terminal_height,
        })
    }

    /// Open a session channel with a PTY and an interactive shell.
    pub async fn open_channel(&self) -> Result<Channel<Msg>, TransportError> {
        let channel = self.session.channel_open_session().await?;

        channel
            .request_pty(
                true,
                "xterm",
                self.terminal_width,
                self.terminal_height,
                0,
                0,
                &[],
            )
            .await?;

        channel.request_shell(true).await?;

        Ok(channel)
    }

    async fn authenticate(
        session: &mut Handle<SshHandler>,
        config: &SshConfig,
    ) -> Result<(), TransportError> {
        let success = match &config.auth {
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                let hash_alg = session.best_supported_rsa_hash().await?.flatten();

                session
                    .authenticate_publickey(
                        &config.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            });
        }

        debug!("Authenticated as {}", config.username);
        Ok(())
    }

    /// Disconnect.
    pub async fn close(self) -> Result<(), TransportError> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}

/// russh client callbacks; only host key checking is customised.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// `Ok(true)` if known and matching, `Ok(false)` if unknown.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> Result<bool, TransportError> {
        let result = match self.known_hosts_path {
            Some(ref path) => {
                russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
            }
            None => russh::keys::check_known_hosts(&self.host, self.port, pubkey),
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    fn learn_host_key(&self, pubkey: &PublicKey) -> Result<(), TransportError> {
        let result = match self.known_hosts_path {
            Some(ref path) => russh::keys::known_hosts::learn_known_hosts_path(
                &self.host, self.port, pubkey, path,
            ),
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey),
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        if self.host_key_verification == HostKeyVerification::Disabled {
            return Ok(true);
        }

        let accepted = match (self.host_key_verification, self.check_known_hosts(server_public_key)) {
            (_, Ok(true)) => true,
            (HostKeyVerification::AcceptNew, Ok(false)) => {
                if let Err(e) = self.learn_host_key(server_public_key) {
                    warn!("Failed to save host key: {}", e);
                }
                true
            }
            (_, Ok(false)) => self.reject(TransportError::HostKeyUnknown {
                host: self.host.clone(),
                port: self.port,
            }),
            (_, Err(e)) => self.reject(e),
        };
        Ok(accepted)
    }
}
