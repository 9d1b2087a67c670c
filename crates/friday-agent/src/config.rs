//! Agent configuration loading from file and environment variables.

use crate::error::AgentError;
use crate::tools::email::MailCredentials;
use friday_types::Credentials;
use friday_voice::LiveKitConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "friday.toml";

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Room the assistant joins.
    #[serde(default)]
    pub room: RoomConfig,

    /// Hosted service endpoints.
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Room binding for the assistant participant.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// Name of the room to join.
    #[serde(default = "default_room_name")]
    pub name: String,

    /// Participant identity of the assistant.
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Display name shown to other participants.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

/// Base URLs of the hosted services the assistant calls.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_openai_url")]
    pub openai: String,

    #[serde(default = "default_google_url")]
    pub google: String,

    #[serde(default = "default_google_tts_url")]
    pub google_tts: String,

    #[serde(default = "default_weather_url")]
    pub weather: String,

    #[serde(default = "default_search_url")]
    pub search: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "friday_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_room_name() -> String {
    "friday-room".to_string()
}

fn default_identity() -> String {
    "friday-assistant".to_string()
}

fn default_display_name() -> String {
    "Friday".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_google_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_google_tts_url() -> String {
    friday_voice::tts::DEFAULT_TTS_BASE_URL.to_string()
}

fn default_weather_url() -> String {
    "https://wttr.in".to_string()
}

fn default_search_url() -> String {
    "https://api.duckduckgo.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            name: default_room_name(),
            identity: default_identity(),
            display_name: default_display_name(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            openai: default_openai_url(),
            google: default_google_url(),
            google_tts: default_google_tts_url(),
            weather: default_weather_url(),
            search: default_search_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Returns the configuration path and where it came from.
///
/// `FRIDAY_CONFIG_PATH` wins when set and non-blank; otherwise
/// [`DEFAULT_CONFIG_PATH`] is used.
pub fn resolve_config_path() -> (String, &'static str) {
    match std::env::var("FRIDAY_CONFIG_PATH") {
        Ok(path) if !path.trim().is_empty() => (path, "env-var"),
        _ => (DEFAULT_CONFIG_PATH.to_string(), "default"),
    }
}

/// Loads configuration from a TOML file, falling back to defaults, with
/// overrides from the process environment.
///
/// Environment variable overrides:
/// - `FRIDAY_ROOM` overrides `room.name`
/// - `FRIDAY_IDENTITY` overrides `room.identity`
/// - `FRIDAY_DISPLAY_NAME` overrides `room.display_name`
/// - `OPENAI_BASE_URL` overrides `endpoints.openai`
/// - `GOOGLE_API_BASE_URL` overrides `endpoints.google`
/// - `GOOGLE_TTS_BASE_URL` overrides `endpoints.google_tts`
/// - `FRIDAY_LOG_LEVEL` overrides `logging.level`
/// - `FRIDAY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`], reading overrides through `lookup`.
pub fn load_config_with<F>(path: Option<&str>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    let set = |target: &mut String, name: &str| {
        if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
            *target = value.trim().to_string();
        }
    };

    set(&mut config.room.name, "FRIDAY_ROOM");
    set(&mut config.room.identity, "FRIDAY_IDENTITY");
    set(&mut config.room.display_name, "FRIDAY_DISPLAY_NAME");
    set(&mut config.endpoints.openai, "OPENAI_BASE_URL");
    set(&mut config.endpoints.google, "GOOGLE_API_BASE_URL");
    set(&mut config.endpoints.google_tts, "GOOGLE_TTS_BASE_URL");
    set(&mut config.logging.level, "FRIDAY_LOG_LEVEL");
    if let Some(json) = lookup("FRIDAY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

/// Secrets read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub livekit: LiveKitConfig,
    pub credentials: Credentials,
    pub mail: Option<MailCredentials>,
}

impl Secrets {
    pub fn from_env() -> Result<Self, AgentError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads every secret through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::MissingCredentials` naming every LiveKit variable
    /// that is unset or blank. Provider keys are optional here; whether one
    /// is usable is decided by the provider selector.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let livekit = LiveKitConfig::from_lookup(&lookup).map_err(AgentError::MissingCredentials)?;
        Ok(Self {
            livekit,
            credentials: Credentials::from_lookup(&lookup),
            mail: MailCredentials::from_lookup(&lookup),
        })
    }
}
