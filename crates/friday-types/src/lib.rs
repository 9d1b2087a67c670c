//! Shared types for the Friday voice assistant.
//!
//! This crate holds the data model that the agent and voice crates agree on:
//! which hosted providers exist, how a selected provider is configured, which
//! credentials were found in the environment, and which optional capabilities
//! were compiled into the running binary.
//!
//! Nothing here performs I/O. Values are built once at startup and passed
//! down explicitly, so every decision made on top of them stays a pure
//! function that tests can drive directly.

pub mod capability;
pub mod provider;

pub use capability::{Capabilities, Capability};
pub use provider::{
    ApiKey, ChatSpeechConfig, Credentials, ProviderConfig, ProviderDiagnostic, ProviderId,
    RealtimeVoiceConfig, SpeechConfig, DEFAULT_CHAT_MODEL, DEFAULT_REALTIME_MODEL,
    DEFAULT_REALTIME_TEMPERATURE, DEFAULT_REALTIME_VOICE, DEFAULT_SPEECH_LANGUAGE,
    DEFAULT_SPEECH_VOICE,
};

/// Instructions that define the assistant's persona for every provider.
pub const AGENT_INSTRUCTION: &str = "You are Friday, a personal assistant modelled on a \
discreet, well-mannered butler. Speak in one or two short sentences, be warm with a light \
touch of dry humour, and use the tools you have when a request calls for live information \
or for sending an email. When you complete a task, confirm it briefly.";

/// Instruction for the first reply issued once the session is connected.
pub const SESSION_INSTRUCTION: &str = "Introduce yourself as Friday, the user's personal \
assistant, and ask how you can help today.";
