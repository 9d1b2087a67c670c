use std::fmt;
use std::time::Duration;

/// Lifetime of the access tokens minted for the assistant.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Connection settings for a LiveKit server.
///
/// Built from the environment at startup; the secret never appears in
/// `Debug` output.
#[derive(Clone)]
pub struct LiveKitConfig {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
    pub token_ttl: Duration,
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl LiveKitConfig {
    pub const URL_VAR: &'static str = "LIVEKIT_URL";
    pub const API_KEY_VAR: &'static str = "LIVEKIT_API_KEY";
    pub const API_SECRET_VAR: &'static str = "LIVEKIT_API_SECRET";

    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Reads the LiveKit URL, key and secret through `lookup`.
    ///
    /// On failure returns the names of every variable that is unset or blank,
    /// so they can be reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Vec<&'static str>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let url = read(Self::URL_VAR);
        let api_key = read(Self::API_KEY_VAR);
        let api_secret = read(Self::API_SECRET_VAR);

        if missing.is_empty() {
            Ok(Self::new(url, api_key, api_secret))
        } else {
            Err(missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_missing_variable() {
        let missing = LiveKitConfig::from_lookup(|name| match name {
            "LIVEKIT_URL" => Some("wss://example.livekit.cloud".to_string()),
            "LIVEKIT_API_SECRET" => Some("   ".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert_eq!(missing, vec!["LIVEKIT_API_KEY", "LIVEKIT_API_SECRET"]);
    }

    #[test]
    fn reads_complete_triplet() {
        let config = LiveKitConfig::from_lookup(|name| Some(format!("{name}-value"))).unwrap();
        assert_eq!(config.url, "LIVEKIT_URL-value");
        assert_eq!(config.api_key, "LIVEKIT_API_KEY-value");
        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn debug_redacts_secret() {
        let config = LiveKitConfig::new("http://localhost:7880", "devkey", "supersecret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("supersecret"));
    }
}
