//! Error taxonomy for assistant startup and sessions.

use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::selector::NoProviderAvailable;
use friday_voice::VoiceError;
use thiserror::Error;

/// Errors that end an assistant run.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Required environment variables are unset or blank.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No provider can be constructed from the available plugins and keys.
    #[error(transparent)]
    NoProviderAvailable(#[from] NoProviderAvailable),

    /// The room connection could not be established or was lost.
    #[error("channel connection failed: {0}")]
    ChannelConnection(#[from] VoiceError),

    /// The provider failed to open a session or generate a reply.
    #[error("provider error: {0}")]
    Backend(#[from] BackendError),

    /// A session operation was called in the wrong lifecycle state.
    #[error("session error: {0}")]
    Session(String),
}

impl AgentError {
    /// Human-readable steps for resolving this error.
    pub fn troubleshooting(&self) -> &'static [&'static str] {
        match self {
            Self::MissingCredentials(_) => &[
                "Add the missing variables to your environment or .env file:",
                "  LIVEKIT_URL=wss://your-project.livekit.cloud",
                "  LIVEKIT_API_KEY=your-api-key",
                "  LIVEKIT_API_SECRET=your-secret",
            ],
            Self::Config(_) => &["Check FRIDAY_CONFIG_PATH and the TOML syntax of the file."],
            Self::NoProviderAvailable(_) => &[
                "Set OPENAI_API_KEY or GOOGLE_API_KEY in your .env file.",
                "Make sure the matching provider feature is enabled in this build.",
            ],
            Self::ChannelConnection(_) | Self::Backend(_) | Self::Session(_) => &[
                "1. Verify your LiveKit and provider credentials are correct",
                "2. Check your internet connection",
                "3. Make sure your LiveKit project is active and the provider service is up",
            ],
        }
    }
}
