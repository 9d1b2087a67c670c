//! Provider identities, credentials and the selected provider configuration.

use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Realtime model used when the realtime-voice provider is selected.
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-4o-realtime-preview";
/// Voice used by the realtime-voice provider.
pub const DEFAULT_REALTIME_VOICE: &str = "alloy";
/// Sampling temperature used by the realtime-voice provider.
pub const DEFAULT_REALTIME_TEMPERATURE: f32 = 0.8;
/// Chat model used when the chat+speech provider is selected.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";
/// Speech synthesis voice paired with the chat model.
pub const DEFAULT_SPEECH_VOICE: &str = "en-US-Casual-K";
/// Language of [`DEFAULT_SPEECH_VOICE`].
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

/// A hosted model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// OpenAI, used for realtime voice.
    OpenAi,
    /// Google, used for chat plus separate speech synthesis.
    Google,
}

impl ProviderId {
    /// Providers in selection priority order.
    pub const PRIORITY: [ProviderId; 2] = [ProviderId::OpenAi, ProviderId::Google];

    /// Returns the human-readable provider name.
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Google => "Google",
        }
    }

    /// Returns the environment variable holding this provider's API key.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
        }
    }

    /// Returns the capability that must be compiled in for this provider.
    pub fn capability(self) -> Capability {
        match self {
            Self::OpenAi => Capability::RealtimeVoice,
            Self::Google => Capability::ChatSpeech,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-blank provider API key.
///
/// Surrounding whitespace is trimmed on construction and the value is never
/// printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` when `raw` is empty or whitespace only.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Provider credentials found at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    openai: Option<ApiKey>,
    google: Option<ApiKey>,
}

impl Credentials {
    /// Reads every provider's key through `lookup`.
    ///
    /// Unset and blank values are both treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |id: ProviderId| lookup(id.env_var()).and_then(ApiKey::new);
        Self {
            openai: read(ProviderId::OpenAi),
            google: read(ProviderId::Google),
        }
    }

    /// Returns a copy with the key for `provider` set from `raw`.
    pub fn with(mut self, provider: ProviderId, raw: impl AsRef<str>) -> Self {
        let key = ApiKey::new(raw);
        match provider {
            ProviderId::OpenAi => self.openai = key,
            ProviderId::Google => self.google = key,
        }
        self
    }

    pub fn get(&self, provider: ProviderId) -> Option<&ApiKey> {
        match provider {
            ProviderId::OpenAi => self.openai.as_ref(),
            ProviderId::Google => self.google.as_ref(),
        }
    }
}

/// Why a provider is or is not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderDiagnostic {
    /// The provider's integration is not compiled into this build.
    PluginNotLoaded,
    /// The integration is present and a non-blank key was found.
    CredentialPresent,
    /// The integration is present but the key is unset or blank.
    CredentialAbsent,
}

impl ProviderDiagnostic {
    /// Classifies a provider from its availability and credential.
    pub fn assess(plugin_loaded: bool, key: Option<&ApiKey>) -> Self {
        match (plugin_loaded, key) {
            (false, _) => Self::PluginNotLoaded,
            (true, Some(_)) => Self::CredentialPresent,
            (true, None) => Self::CredentialAbsent,
        }
    }

    pub fn is_usable(self) -> bool {
        self == Self::CredentialPresent
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PluginNotLoaded => "plugin not loaded",
            Self::CredentialPresent => "credential present",
            Self::CredentialAbsent => "credential absent/blank",
        }
    }
}

impl fmt::Display for ProviderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Speech synthesis settings for providers without built-in voice output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Voice name understood by the synthesis service.
    pub voice: String,
    /// BCP-47 language code of the voice.
    pub language_code: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: DEFAULT_SPEECH_VOICE.to_string(),
            language_code: DEFAULT_SPEECH_LANGUAGE.to_string(),
        }
    }
}

/// Configuration of a realtime speech-to-speech provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeVoiceConfig {
    pub provider: ProviderId,
    pub model: String,
    pub voice: String,
    pub temperature: f32,
}

impl RealtimeVoiceConfig {
    /// The fixed OpenAI realtime configuration.
    pub fn openai() -> Self {
        Self {
            provider: ProviderId::OpenAi,
            model: DEFAULT_REALTIME_MODEL.to_string(),
            voice: DEFAULT_REALTIME_VOICE.to_string(),
            temperature: DEFAULT_REALTIME_TEMPERATURE,
        }
    }
}

/// Configuration of a chat provider paired with speech synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSpeechConfig {
    pub provider: ProviderId,
    pub model: String,
    /// Separate synthesis settings; `None` when the chat model speaks itself.
    pub speech: Option<SpeechConfig>,
}

impl ChatSpeechConfig {
    /// The fixed Google chat + speech configuration.
    pub fn google() -> Self {
        Self {
            provider: ProviderId::Google,
            model: DEFAULT_CHAT_MODEL.to_string(),
            speech: Some(SpeechConfig::default()),
        }
    }
}

/// The provider configuration chosen for one assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    RealtimeVoice(RealtimeVoiceConfig),
    ChatSpeech(ChatSpeechConfig),
}

impl ProviderConfig {
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::RealtimeVoice(config) => config.provider,
            Self::ChatSpeech(config) => config.provider,
        }
    }

    /// Short description of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RealtimeVoice(_) => "realtime_voice",
            Self::ChatSpeech(_) => "chat_speech",
        }
    }
}
