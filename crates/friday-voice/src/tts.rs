use crate::error::VoiceError;
use base64::Engine;
use friday_types::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Google Cloud Text-to-Speech endpoint.
pub const DEFAULT_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com";

/// Maximum text input size per synthesis request, in bytes. The hosted
/// service rejects anything longer.
const MAX_TTS_INPUT_BYTES: usize = 5000;

/// Timeout for a single synthesis request.
const TTS_TIMEOUT: Duration = Duration::from_secs(30);

/// Sample rate requested from the synthesis service.
pub const TTS_SAMPLE_RATE_HZ: u32 = 24_000;

/// Size of the RIFF/WAV header in front of LINEAR16 output.
const WAV_HEADER_BYTES: usize = 44;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    sample_rate_hertz: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Service for generating speech from text with a hosted voice.
#[derive(Debug, Clone)]
pub struct TtsService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    speech: SpeechConfig,
}

impl TtsService {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        speech: SpeechConfig,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            speech,
        }
    }

    pub fn voice(&self) -> &str {
        &self.speech.voice
    }

    /// Synthesizes speech from the given text.
    ///
    /// Returns raw PCM audio data (s16le mono, [`TTS_SAMPLE_RATE_HZ`]).
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::Tts("text is empty".to_string()));
        }
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::Tts(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.speech.language_code,
                name: &self.speech.voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16",
                sample_rate_hertz: TTS_SAMPLE_RATE_HZ,
            },
        };

        let response = self
            .http
            .post(format!("{}/v1/text:synthesize", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .timeout(TTS_TIMEOUT)
            .send()
            .await
            .map_err(|e| VoiceError::Tts(format!("synthesis request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Tts(format!(
                "synthesis failed with status {}: {}",
                status, body
            )));
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Tts(format!("invalid synthesis response: {}", e)))?;

        let wav_data = base64::engine::general_purpose::STANDARD
            .decode(body.audio_content)
            .map_err(|e| VoiceError::Tts(format!("invalid audio encoding: {}", e)))?;

        // LINEAR16 output is a WAV file.
        Ok(wav_to_pcm(wav_data))
    }
}

/// Strips the 44-byte RIFF header from WAV data to return raw PCM.
///
/// Data without a RIFF header is returned unchanged.
pub fn wav_to_pcm(data: Vec<u8>) -> Vec<u8> {
    if data.len() > WAV_HEADER_BYTES && data.starts_with(b"RIFF") {
        data[WAV_HEADER_BYTES..].to_vec()
    } else {
        data
    }
}
