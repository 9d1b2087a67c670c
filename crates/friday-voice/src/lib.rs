//! Voice infrastructure for the Friday assistant.
//!
//! Integrates with LiveKit for room management and access tokens, exposes the
//! [`Channel`] abstraction that an assistant session binds to, and provides
//! hosted TTS (text-to-speech) for providers that have no voice output of
//! their own.
//!
//! Media transport stays with LiveKit: this crate only drives the room service
//! API and hands rendered replies to the room.

pub mod agent;
pub mod channel;
pub mod config;
pub mod error;
pub mod service;
pub mod tts;

pub use agent::LiveKitChannel;
pub use channel::{Channel, NoiseCancellation, Participant, RoomInputOptions};
pub use config::LiveKitConfig;
pub use error::VoiceError;
pub use service::VoiceService;
pub use tts::TtsService;
