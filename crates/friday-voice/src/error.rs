use thiserror::Error;

/// Errors raised by the LiveKit room service, tokens and speech synthesis.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit token error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    #[error("room service error: {0}")]
    RoomService(String),

    #[error("not connected to room '{0}'")]
    NotConnected(String),

    #[error("invalid voice configuration: {0}")]
    Config(String),

    #[error("speech synthesis error: {0}")]
    Tts(String),
}
