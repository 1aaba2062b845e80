//! Generic driver that works with any platform definition.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use regex::bytes::Regex;
use secrecy::ExposeSecret;

use super::privilege::PrivilegeManager;
use super::response::Response;
use crate::channel::PtyChannel;
use crate::error::{ChannelError, SessionError};
use crate::platform::PlatformDefinition;
use crate::transport::{AuthMethod, SshConfig, SshTransport};

/// Bytes from the end of the output searched for a prompt.
const SEARCH_DEPTH: usize = 1000;

/// Time a device may wait on each unanswered ping echo.
const PING_ECHO_TIMEOUT: Duration = Duration::from_secs(2);

/// Silence that marks the end of stale output after a timed-out read.
const SETTLE_TIME: Duration = Duration::from_millis(500);

/// Async driver for one device.
///
/// Handles:
/// - SSH transport and PTY shell lifetime
/// - Command execution with prompt detection
/// - Privilege level navigation (enable, configure terminal, end)
/// - Failure detection from platform failure substrings
pub struct GenericDriver {
    ssh_config: SshConfig,
    platform: PlatformDefinition,
    transport: Option<SshTransport>,
    channel: Option<PtyChannel>,
    privileges: PrivilegeManager,
    timeout: Duration,
    prompt_pattern: Regex,
}

impl GenericDriver {
    /// Create a driver; nothing is connected until [`open`](Self::open).
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition) -> Result<Self, SessionError> {
        let prompt_pattern = platform
            .prompt_pattern()
            .map_err(ChannelError::InvalidPattern)?;

        Ok(Self {
            timeout: ssh_config.timeout,
            privileges: PrivilegeManager::new(platform.privilege_levels.clone()),
            ssh_config,
            platform,
            transport: None,
            channel: None,
            prompt_pattern,
        })
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    pub fn current_privilege(&self) -> Option<&str> {
        self.privileges.current().map(|level| level.name.as_str())
    }

    /// Connect, settle at the default privilege level and run on-open commands.
    pub async fn open(&mut self) -> Result<(), SessionError> {
        if self.is_open() {
            return Ok(());
        }

        let transport = SshTransport::connect(&self.ssh_config).await?;
        let channel = PtyChannel::new(transport.open_channel().await?, SEARCH_DEPTH);
        self.transport = Some(transport);
        self.channel = Some(channel);

        let (_, prompt) = self.read_until_prompt(self.timeout).await?;
        let level = self.privileges.update_from_prompt(&prompt)?;
        debug!("Initial prompt {:?} at level {}", prompt, level);

        let default = self.platform.default_privilege.clone();
        self.acquire_privilege(&default).await?;

        for command in self.platform.on_open_commands.clone() {
            self.send_command(&command).await?;
        }

        info!(
            "Session open to {} ({})",
            self.ssh_config.host, self.platform.name
        );
        Ok(())
    }

    /// Close the shell and disconnect. Safe to call more than once.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        if let Some(channel) = self.channel.take() {
            if let Err(e) = channel.close().await {
                debug!("Channel close: {}", e);
            }
        }
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
            info!("Disconnected from {}", self.ssh_config.host);
        }
        Ok(())
    }

    fn channel(&mut self) -> Result<&mut PtyChannel, SessionError> {
        self.channel.as_mut().ok_or(SessionError::NotConnected)
    }

    /// Read up to the next prompt; returns the text and the prompt line.
    async fn read_until_prompt(
        &mut self,
        timeout: Duration,
    ) -> Result<(String, String), SessionError> {
        let pattern = self.prompt_pattern.clone();
        let data = self.channel()?.read_until_pattern(&pattern, timeout).await?;

        let text = String::from_utf8_lossy(&data).into_owned();
        let prompt = last_line(&text).trim().to_string();
        Ok((text, prompt))
    }

    /// Send one command at the current privilege level.
    pub async fn send_command(&mut self, command: &str) -> Result<Response, SessionError> {
        let start = Instant::now();
        self.channel()?.send(command).await?;
        let (raw_result, prompt) = match self
            .read_until_prompt(command_timeout(command, self.timeout))
            .await
        {
            Err(SessionError::Channel(ChannelError::PatternTimeout(waited))) => {
                warn!("No prompt within {:?} after {:?}", waited, command);
                self.resync().await;
                return Err(ChannelError::PatternTimeout(waited).into());
            }
            read => read?,
        };

        if let Err(e) = self.privileges.update_from_prompt(&prompt) {
            debug!("{}", e);
        }

        let result = normalize_output(&raw_result, command);
        let failure_message = self.platform.detect_failure(&result).map(str::to_string);
        if let Some(ref failure) = failure_message {
            warn!("Command {:?} failed: {}", command, failure);
        }

        Ok(Response {
            command: command.to_string(),
            result,
            raw_result,
            prompt,
            elapsed: start.elapsed(),
            failure_message,
        })
    }

    /// Send commands in configuration mode.
    ///
    /// Sending stops at the first rejected command. The driver returns to
    /// the level it started from whether or not the commands succeeded.
    pub async fn send_config(&mut self, commands: &[String]) -> Result<Vec<Response>, SessionError> {
        let original = self
            .current_privilege()
            .unwrap_or(self.platform.default_privilege.as_str())
            .to_string();
        let config = self.platform.config_privilege.clone();

        self.acquire_privilege(&config).await?;

        let sent = self.send_config_lines(commands).await;
        let restored = self.acquire_privilege(&original).await;

        let responses = sent?;
        restored?;
        Ok(responses)
    }

    async fn send_config_lines(&mut self, commands: &[String]) -> Result<Vec<Response>, SessionError> {
        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            if !keep_sending(&responses) {
                break;
            }
            responses.push(self.send_command(command).await?);
        }
        Ok(responses)
    }

    /// Get back to a clean prompt after a timed-out read.
    ///
    /// Output still arriving from the abandoned command is thrown away. If
    /// the device does not settle, the shell is dropped and later calls fail
    /// with [`SessionError::NotConnected`].
    async fn resync(&mut self) {
        let timeout = self.timeout;
        let pattern = self.prompt_pattern.clone();
        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        match resync_channel(channel, &pattern, timeout).await {
            Ok(prompt) => {
                debug!("Shell resynchronised at {:?}", prompt);
                if let Err(e) = self.privileges.update_from_prompt(&prompt) {
                    debug!("{}", e);
                }
            }
            Err(e) => {
                warn!("Could not resynchronise shell, dropping it: {}", e);
                self.channel = None;
            }
        }
    }

    /// Walk the privilege tree to `target`.
    pub async fn acquire_privilege(&mut self, target: &str) -> Result<(), SessionError> {
        let current = self
            .current_privilege()
            .ok_or(SessionError::NotConnected)?
            .to_string();
        if current == target {
            return Ok(());
        }

        let path = self.privileges.find_path(&current, target)?;
        for step in path.windows(2) {
            let (from, to) = (&step[0], &step[1]);
            let (command, auth_prompt) = self
                .privileges
                .transition(from, to)
                .map(|(cmd, auth)| (cmd.to_string(), auth.cloned()))
                .ok_or_else(|| SessionError::PrivilegeAcquisitionFailed { target: to.clone() })?;

            debug!("Privilege {} -> {} via {:?}", from, to, command);
            self.channel()?.send(&command).await?;

            if let Some(auth) = auth_prompt {
                self.answer_password_prompt(&auth).await?;
            }

            let (_, prompt) = self.read_until_prompt(self.timeout).await?;
            let reached = self.privileges.update_from_prompt(&prompt)?;
            if reached != to.as_str() {
                return Err(SessionError::PrivilegeAcquisitionFailed { target: to.clone() });
            }
        }

        Ok(())
    }

    /// Wait for either a password prompt or a device prompt after escalating,
    /// answering the former with the login password.
    async fn answer_password_prompt(&mut self, auth: &Regex) -> Result<(), SessionError> {
        let timeout = self.timeout;
        let either = Regex::new(&format!(
            "(?:{})|(?:{})",
            auth.as_str(),
            self.prompt_pattern.as_str()
        ))
        .map_err(ChannelError::InvalidPattern)?;

        let channel = self.channel()?;
        let data = channel.read_until_pattern(&either, timeout).await?;
        if !auth.is_match(&data) {
            // Already escalated without a password; put the prompt back
            channel.push_back(&data);
            return Ok(());
        }

        match &self.ssh_config.auth {
            AuthMethod::Password(password) => {
                let secret = password.expose_secret().to_string();
                self.channel()?.send(&secret).await?;
                Ok(())
            }
            AuthMethod::PrivateKey { .. } => Err(SessionError::PrivilegeAcquisitionFailed {
                target: "privileged mode (enable password required)".to_string(),
            }),
        }
    }
}

/// Send a bare newline, wait for a prompt and discard whatever follows it.
///
/// Returns the prompt line.
async fn resync_channel(
    channel: &mut PtyChannel,
    pattern: &Regex,
    timeout: Duration,
) -> Result<String, ChannelError> {
    channel.send("").await?;
    let data = channel.read_until_pattern(pattern, timeout).await?;
    channel.drain(SETTLE_TIME, timeout).await?;
    Ok(last_line(&String::from_utf8_lossy(&data)).trim().to_string())
}

/// Whether a config push goes on after `responses`: it stops at the first
/// rejected command.
fn keep_sending(responses: &[Response]) -> bool {
    responses.last().is_none_or(Response::is_success)
}

/// Read deadline for `command`. A `ping` gets extra time for every echo
/// that may go unanswered.
fn command_timeout(command: &str, base: Duration) -> Duration {
    let mut words = command.split_whitespace();
    if words.next() != Some("ping") {
        return base;
    }
    let repeat = words
        .skip_while(|word| *word != "repeat")
        .nth(1)
        .and_then(|count| count.parse::<u32>().ok())
        .unwrap_or(5);
    base + PING_ECHO_TIMEOUT * repeat
}

/// Text after the last newline.
fn last_line(text: &str) -> &str {
    match memchr::memrchr(b'\n', text.as_bytes()) {
        Some(pos) => &text[pos + 1..],
        None => text,
    }
}

/// Strip the command echo and the trailing prompt (last line).
///
/// Anything before the echo line is dropped too. Without an echo the whole
/// body is kept.
pub(crate) fn normalize_output(raw: &str, command: &str) -> String {
    let without_prompt = match memchr::memrchr(b'\n', raw.as_bytes()) {
        Some(pos) => &raw[..pos],
        None => return String::new(),
    };

    let command = command.trim();
    let mut body = without_prompt;
    if !command.is_empty() {
        let mut offset = 0;
        for line in without_prompt.split_inclusive('\n') {
            offset += line.len();
            if line.trim_end().ends_with(command) {
                body = &without_prompt[offset..];
                break;
            }
        }
    }

    body.trim_end_matches('\n').to_string()
}
