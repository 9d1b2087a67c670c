//! Friday voice assistant library logic.
//!
//! Startup reads configuration and secrets once, probes which optional
//! capabilities were compiled in, selects a provider, and bootstraps a
//! session against a LiveKit room.

pub mod assistant;
pub mod backend;
pub mod config;
pub mod error;
pub mod selector;
pub mod session;
pub mod tools;

pub use assistant::Assistant;
pub use error::AgentError;
pub use session::{bootstrap, AgentSession, BootstrapOutcome, SessionState};

use friday_types::{Capabilities, Capability};

/// Reports the optional capabilities compiled into this build.
///
/// Each capability maps to a Cargo feature of this crate. The result is
/// computed once at startup and passed down as plain data.
pub fn probe_capabilities() -> Capabilities {
    let mut capabilities = Capabilities::none();
    if cfg!(feature = "openai") {
        capabilities.insert(Capability::RealtimeVoice);
    }
    if cfg!(feature = "google") {
        capabilities.insert(Capability::ChatSpeech);
    }
    if cfg!(feature = "noise-cancellation") {
        capabilities.insert(Capability::NoiseCancellation);
    }
    capabilities
}

/// Installs the global tracing subscriber.
///
/// Invalid filter strings fall back to `info`.
pub fn init_tracing(logging: &config::LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
