//! Conversation session lifecycle and bootstrap.
//!
//! A session exclusively owns its channel from `start` until `close`. The
//! lifecycle is `Idle -> Started -> Connected -> Closed`; every transition is
//! driven by one task, suspending only on the channel and provider calls.

use crate::assistant::Assistant;
use crate::backend::{ModelBackend, Reply};
use crate::error::AgentError;
use friday_types::{Capabilities, Capability, SESSION_INSTRUCTION};
use friday_voice::{Channel, NoiseCancellation, Participant, RoomInputOptions};
use std::fmt;
use std::future::Future;
use tracing::{debug, info};
use uuid::Uuid;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Started,
    Connected,
    Closed,
}

/// Builds room input options from the available capabilities.
///
/// Video input is always enabled. Noise cancellation is included only when
/// its capability is present; otherwise it is left out without error.
pub fn input_options_for(capabilities: &Capabilities) -> RoomInputOptions {
    let noise_cancellation = if capabilities.contains(Capability::NoiseCancellation) {
        Some(NoiseCancellation::Bvc)
    } else {
        debug!("noise cancellation unavailable, continuing without it");
        None
    };

    RoomInputOptions {
        video_enabled: true,
        noise_cancellation,
    }
}

/// One conversation between the assistant and a room.
pub struct AgentSession<C: Channel> {
    id: Uuid,
    assistant: Assistant,
    backend: Box<dyn ModelBackend>,
    channel: Option<C>,
    options: Option<RoomInputOptions>,
    state: SessionState,
}

impl<C: Channel> fmt::Debug for AgentSession<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentSession")
            .field("id", &self.id)
            .field("provider", &self.backend.provider())
            .field("room", &self.channel.as_ref().map(|c| c.room_name()))
            .field("options", &self.options)
            .field("state", &self.state)
            .finish()
    }
}

impl<C: Channel> AgentSession<C> {
    pub fn new(assistant: Assistant, backend: Box<dyn ModelBackend>) -> Self {
        Self {
            id: Uuid::new_v4(),
            assistant,
            backend,
            channel: None,
            options: None,
            state: SessionState::Idle,
        }
    }

    /// Identifier attached to every log line of this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn input_options(&self) -> Option<&RoomInputOptions> {
        self.options.as_ref()
    }

    pub fn channel(&self) -> Option<&C> {
        self.channel.as_ref()
    }

    fn require(&self, expected: SessionState, operation: &str) -> Result<(), AgentError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AgentError::Session(format!(
                "cannot {} while session is {:?}",
                operation, self.state
            )))
        }
    }

    /// Opens the provider session and binds the channel.
    pub async fn start(&mut self, channel: C, options: RoomInputOptions) -> Result<(), AgentError> {
        self.require(SessionState::Idle, "start")?;

        self.backend
            .open(self.assistant.instructions(), self.assistant.tools())
            .await?;

        info!(
            session_id = %self.id,
            room = channel.room_name(),
            provider = %self.backend.provider(),
            video = options.video_enabled,
            noise_cancellation = options.noise_cancellation.is_some(),
            "session started"
        );

        self.channel = Some(channel);
        self.options = Some(options);
        self.state = SessionState::Started;
        Ok(())
    }

    /// Establishes the room connection for a started session.
    pub async fn connect(&mut self) -> Result<(), AgentError> {
        self.require(SessionState::Started, "connect")?;

        let options = self.options.clone().unwrap_or_default();
        let channel = self
            .channel
            .as_mut()
            .ok_or_else(|| AgentError::Session("session has no channel".to_string()))?;
        channel.connect(&options).await?;
        info!(session_id = %self.id, room = channel.room_name(), "session connected");

        self.state = SessionState::Connected;
        Ok(())
    }

    /// Generates one reply following `instructions` and delivers it to the room.
    pub async fn generate_reply(&self, instructions: &str) -> Result<Reply, AgentError> {
        self.require(SessionState::Connected, "generate a reply")?;

        let channel = self
            .channel
            .as_ref()
            .ok_or_else(|| AgentError::Session("session has no channel".to_string()))?;

        let reply = self
            .backend
            .respond(instructions, self.assistant.tools())
            .await?;
        channel
            .publish_reply(&reply.text, reply.audio.as_deref())
            .await?;

        info!(
            session_id = %self.id,
            room = channel.room_name(),
            chars = reply.text.len(),
            audio_bytes = reply.audio.as_ref().map_or(0, Vec::len),
            "reply delivered"
        );
        Ok(reply)
    }

    /// Lists who is in the room.
    pub async fn participants(&self) -> Result<Vec<Participant>, AgentError> {
        self.require(SessionState::Connected, "list participants")?;
        match &self.channel {
            Some(channel) => Ok(channel.participants().await?),
            None => Ok(Vec::new()),
        }
    }

    /// Ends the session and disconnects the channel. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if let Some(channel) = self.channel.as_mut() {
            channel.disconnect().await;
        }
        info!(session_id = %self.id, "session closed");
        self.state = SessionState::Closed;
    }
}

/// How a bootstrap raced against shutdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Connected and greeted; the session is live.
    Ready,
    /// Shutdown arrived first; the session has been closed.
    Interrupted,
}

impl<C: Channel> AgentSession<C> {
    /// Starts a conversation: start the session, connect the channel, then greet.
    ///
    /// # Errors
    ///
    /// Any failure is returned after the session has been closed.
    pub async fn bootstrap(
        &mut self,
        channel: C,
        capabilities: &Capabilities,
    ) -> Result<(), AgentError> {
        let options = input_options_for(capabilities);

        let result = async {
            self.start(channel, options).await?;
            self.connect().await?;
            self.generate_reply(SESSION_INSTRUCTION).await?;
            Ok::<_, AgentError>(())
        }
        .await;

        if result.is_err() {
            self.close().await;
        }
        result
    }

    /// Runs [`AgentSession::bootstrap`] until it finishes or `shutdown`
    /// resolves. On shutdown the partly started session is closed, so a
    /// channel that already connected is disconnected.
    pub async fn bootstrap_until<F>(
        &mut self,
        channel: C,
        capabilities: &Capabilities,
        shutdown: F,
    ) -> Result<BootstrapOutcome, AgentError>
    where
        F: Future<Output = ()>,
    {
        let interrupted = tokio::select! {
            result = self.bootstrap(channel, capabilities) => {
                result?;
                false
            }
            () = shutdown => true,
        };

        if interrupted {
            info!(session_id = %self.id, "shutdown requested during bootstrap");
            self.close().await;
            Ok(BootstrapOutcome::Interrupted)
        } else {
            Ok(BootstrapOutcome::Ready)
        }
    }
}

/// Builds a session and bootstraps it against `channel`.
///
/// # Errors
///
/// Any failure is returned to the caller after the session has been closed;
/// no partially started session is handed back.
pub async fn bootstrap<C: Channel>(
    channel: C,
    assistant: Assistant,
    backend: Box<dyn ModelBackend>,
    capabilities: &Capabilities,
) -> Result<AgentSession<C>, AgentError> {
    let mut session = AgentSession::new(assistant, backend);
    session.bootstrap(channel, capabilities).await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_cancellation_follows_capability() {
        let with = input_options_for(&Capabilities::all());
        assert!(with.video_enabled);
        assert_eq!(with.noise_cancellation, Some(NoiseCancellation::Bvc));

        let without = input_options_for(&Capabilities::all().without(Capability::NoiseCancellation));
        assert!(without.video_enabled);
        assert_eq!(without.noise_cancellation, None);
    }
}
