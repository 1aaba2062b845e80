//! PTY shell channel with prompt-driven reads.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use crate::error::ChannelError;

/// Interactive shell channel.
///
/// Writes are line based. Reads accumulate output until a prompt pattern
/// appears at the tail of the buffer.
pub struct PtyChannel {
    channel: Channel<Msg>,
    buffer: PatternBuffer,
}

impl PtyChannel {
    /// Wrap an open shell channel.
    pub fn new(channel: Channel<Msg>, search_depth: usize) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(search_depth),
        }
    }

    /// Send one line followed by a newline.
    pub async fn send(&mut self, line: &str) -> Result<(), ChannelError> {
        trace!("-> {:?}", line);
        let data = format!("{line}\n");
        self.channel
            .data(data.as_bytes())
            .await
            .map_err(ChannelError::Ssh)
    }

    /// Read until `pattern` matches the tail of the output.
    ///
    /// Returns everything read, prompt included, and empties the buffer.
    pub async fn read_until_pattern(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<Vec<u8>, ChannelError> {
        let deadline = tokio::time::Instant::now() + timeout;

        while self.buffer.search_tail(pattern).is_none() {
            let Ok(msg) = tokio::time::timeout_at(deadline, self.channel.wait()).await else {
                // Partial output must not leak into the next read
                self.buffer.clear();
                return Err(ChannelError::PatternTimeout(timeout));
            };

            match msg {
                Some(ChannelMsg::Data { ref data }) => self.buffer.extend(data),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => self.buffer.extend(data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed);
                }
                Some(_) => {}
            }
        }

        let data = self.buffer.take();
        trace!("<- {:?}", String::from_utf8_lossy(&data));
        Ok(data)
    }

    /// Return already-read output to the buffer so the next read sees it.
    pub fn push_back(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Discard output until the device has been silent for `quiet`.
    ///
    /// Fails with [`ChannelError::PatternTimeout`] if output is still
    /// arriving after `limit`.
    pub async fn drain(&mut self, quiet: Duration, limit: Duration) -> Result<(), ChannelError> {
        let deadline = tokio::time::Instant::now() + limit;
        self.buffer.clear();

        loop {
            let next = tokio::time::timeout(quiet, self.channel.wait());
            match tokio::time::timeout_at(deadline, next).await {
                Err(_) => return Err(ChannelError::PatternTimeout(limit)),
                Ok(Err(_)) => break,
                Ok(Ok(Some(ChannelMsg::Eof | ChannelMsg::Close) | None)) => {
                    return Err(ChannelError::Closed);
                }
                Ok(Ok(Some(_))) => {}
            }
        }

        trace!("Drained stale output");
        Ok(())
    }

    /// Close the channel.
    pub async fn close(self) -> Result<(), ChannelError> {
        self.channel.close().await.map_err(ChannelError::Ssh)
    }
}
