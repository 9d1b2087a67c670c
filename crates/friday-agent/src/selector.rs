//! Provider selection.
//!
//! Picks exactly one provider configuration from the compiled-in capabilities
//! and the credentials found at startup. Priority is fixed: realtime voice
//! first, chat plus speech second.

use friday_types::{
    Capabilities, ChatSpeechConfig, Credentials, ProviderConfig, ProviderDiagnostic, ProviderId,
    RealtimeVoiceConfig,
};
use std::fmt;
use thiserror::Error;

/// Diagnostic state of one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderStatus {
    pub provider: ProviderId,
    pub diagnostic: ProviderDiagnostic,
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.provider,
            self.provider.env_var(),
            self.diagnostic
        )
    }
}

/// No provider qualified for selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no usable provider found:\n{}", format_statuses(.statuses))]
pub struct NoProviderAvailable {
    /// One entry per provider, in priority order.
    pub statuses: Vec<ProviderStatus>,
}

fn format_statuses(statuses: &[ProviderStatus]) -> String {
    statuses
        .iter()
        .map(|status| format!("- {}", status))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reports the diagnostic state of every provider, in priority order.
pub fn diagnose(capabilities: &Capabilities, credentials: &Credentials) -> Vec<ProviderStatus> {
    ProviderId::PRIORITY
        .into_iter()
        .map(|provider| ProviderStatus {
            provider,
            diagnostic: ProviderDiagnostic::assess(
                capabilities.contains(provider.capability()),
                credentials.get(provider),
            ),
        })
        .collect()
}

fn config_for(provider: ProviderId) -> ProviderConfig {
    match provider {
        ProviderId::OpenAi => ProviderConfig::RealtimeVoice(RealtimeVoiceConfig::openai()),
        ProviderId::Google => ProviderConfig::ChatSpeech(ChatSpeechConfig::google()),
    }
}

/// Selects the provider configuration for one assistant.
///
/// # Errors
///
/// Returns [`NoProviderAvailable`] with a per-provider diagnostic when no
/// provider has both its capability compiled in and a non-blank credential.
pub fn select_provider(
    capabilities: &Capabilities,
    credentials: &Credentials,
) -> Result<ProviderConfig, NoProviderAvailable> {
    let statuses = diagnose(capabilities, credentials);

    match statuses.iter().find(|status| status.diagnostic.is_usable()) {
        Some(status) => {
            let config = config_for(status.provider);
            tracing::info!(
                provider = %status.provider,
                kind = config.kind(),
                "selected provider"
            );
            Ok(config)
        }
        None => Err(NoProviderAvailable { statuses }),
    }
}
