//! Provider backends.
//!
//! [`build`] is the one place that turns a selected [`ProviderConfig`] into a
//! concrete backend object. Everything upstream of it works with the plain
//! configuration value.

#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "openai")]
pub mod openai;

use crate::config::EndpointConfig;
use crate::tools::ToolSet;
use async_trait::async_trait;
use friday_types::{ApiKey, Credentials, ProviderConfig, ProviderId};
use friday_voice::VoiceError;
use thiserror::Error;

/// Upper bound on model/tool round trips within one reply.
pub const MAX_TOOL_ROUNDS: usize = 4;

/// Errors raised by a provider backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0} support is not compiled into this build")]
    Unavailable(ProviderId),

    #[error("no API key configured for {0}")]
    MissingKey(ProviderId),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: ProviderId,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid response from {provider}: {message}")]
    InvalidResponse {
        provider: ProviderId,
        message: String,
    },

    #[error("speech synthesis failed: {0}")]
    Speech(#[from] VoiceError),

    #[error("{0} session is not open")]
    NotOpen(ProviderId),
}

/// A generated reply, ready to be delivered to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Rendered speech as 16-bit mono PCM, when the provider produced audio.
    pub audio: Option<Vec<u8>>,
}

/// A hosted model the assistant talks through.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    fn provider(&self) -> ProviderId;

    /// Starts the provider-side session with the assistant's instructions.
    async fn open(&mut self, instructions: &str, tools: &ToolSet) -> Result<(), BackendError>;

    /// Generates one reply following `prompt`, running tool calls as needed.
    async fn respond(&self, prompt: &str, tools: &ToolSet) -> Result<Reply, BackendError>;
}

/// Builds the concrete backend for the selected provider.
///
/// # Errors
///
/// Returns `BackendError::MissingKey` if the credential for the selected
/// provider is gone, and `BackendError::Unavailable` if the provider's
/// feature is not compiled in.
pub fn build(
    config: &ProviderConfig,
    credentials: &Credentials,
    endpoints: &EndpointConfig,
    http: reqwest::Client,
) -> Result<Box<dyn ModelBackend>, BackendError> {
    let provider = config.provider();
    let key = credentials
        .get(provider)
        .ok_or(BackendError::MissingKey(provider))?;

    match config {
        ProviderConfig::RealtimeVoice(realtime) => {
            build_realtime(realtime, key, endpoints, http)
        }
        ProviderConfig::ChatSpeech(chat) => build_chat_speech(chat, key, endpoints, http),
    }
}

#[cfg(feature = "openai")]
fn build_realtime(
    config: &friday_types::RealtimeVoiceConfig,
    key: &ApiKey,
    endpoints: &EndpointConfig,
    http: reqwest::Client,
) -> Result<Box<dyn ModelBackend>, BackendError> {
    Ok(Box::new(openai::OpenAiRealtime::new(
        http,
        &endpoints.openai,
        key.clone(),
        config.clone(),
    )))
}

#[cfg(not(feature = "openai"))]
fn build_realtime(
    config: &friday_types::RealtimeVoiceConfig,
    _key: &ApiKey,
    _endpoints: &EndpointConfig,
    _http: reqwest::Client,
) -> Result<Box<dyn ModelBackend>, BackendError> {
    Err(BackendError::Unavailable(config.provider))
}

#[cfg(feature = "google")]
fn build_chat_speech(
    config: &friday_types::ChatSpeechConfig,
    key: &ApiKey,
    endpoints: &EndpointConfig,
    http: reqwest::Client,
) -> Result<Box<dyn ModelBackend>, BackendError> {
    Ok(Box::new(google::GeminiChat::new(
        http,
        endpoints,
        key.clone(),
        config.clone(),
    )))
}

#[cfg(not(feature = "google"))]
fn build_chat_speech(
    config: &friday_types::ChatSpeechConfig,
    _key: &ApiKey,
    _endpoints: &EndpointConfig,
    _http: reqwest::Client,
) -> Result<Box<dyn ModelBackend>, BackendError> {
    Err(BackendError::Unavailable(config.provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use friday_types::{ChatSpeechConfig, RealtimeVoiceConfig};

    #[test]
    fn build_requires_the_selected_key() {
        let config = ProviderConfig::RealtimeVoice(RealtimeVoiceConfig::openai());
        let credentials = Credentials::default().with(ProviderId::Google, "g-key");

        let result = build(
            &config,
            &credentials,
            &EndpointConfig::default(),
            reqwest::Client::new(),
        );
        assert!(matches!(
            result,
            Err(BackendError::MissingKey(ProviderId::OpenAi))
        ));
    }

    #[test]
    fn build_interprets_the_tag() {
        let credentials = Credentials::default()
            .with(ProviderId::OpenAi, "sk")
            .with(ProviderId::Google, "g-key");

        for config in [
            ProviderConfig::RealtimeVoice(RealtimeVoiceConfig::openai()),
            ProviderConfig::ChatSpeech(ChatSpeechConfig::google()),
        ] {
            let compiled = match config.provider() {
                ProviderId::OpenAi => cfg!(feature = "openai"),
                ProviderId::Google => cfg!(feature = "google"),
            };
            match build(
                &config,
                &credentials,
                &EndpointConfig::default(),
                reqwest::Client::new(),
            ) {
                Ok(backend) => {
                    assert!(compiled);
                    assert_eq!(backend.provider(), config.provider());
                }
                Err(BackendError::Unavailable(provider)) => {
                    assert!(!compiled);
                    assert_eq!(provider, config.provider());
                }
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
    }
}
