//! The communication channel an assistant session is bound to.

use crate::error::VoiceError;
use async_trait::async_trait;
use serde::Serialize;

/// Input filters that can be applied to incoming room audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseCancellation {
    /// Background voice cancellation: suppresses noise and other speakers.
    Bvc,
}

/// How the assistant consumes room input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInputOptions {
    pub video_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_cancellation: Option<NoiseCancellation>,
}

impl Default for RoomInputOptions {
    fn default() -> Self {
        Self {
            video_enabled: true,
            noise_cancellation: None,
        }
    }
}

/// A participant currently present in the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub identity: String,
    pub name: String,
}

/// A connected real-time room that an assistant speaks into.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Name of the room this channel is bound to.
    fn room_name(&self) -> &str;

    fn is_connected(&self) -> bool;

    /// Joins the room with the given input options.
    async fn connect(&mut self, options: &RoomInputOptions) -> Result<(), VoiceError>;

    /// Lists the participants currently in the room.
    async fn participants(&self) -> Result<Vec<Participant>, VoiceError>;

    /// Delivers a generated reply to the room.
    ///
    /// `audio` is 16-bit mono PCM when the provider rendered speech.
    async fn publish_reply(&self, text: &str, audio: Option<&[u8]>) -> Result<(), VoiceError>;

    /// Leaves the room. Calling this on a disconnected channel does nothing.
    async fn disconnect(&mut self);
}
