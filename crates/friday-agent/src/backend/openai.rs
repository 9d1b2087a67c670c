//! OpenAI realtime voice backend.
//!
//! Opening the backend creates a realtime session bound to the assistant's
//! voice, temperature, instructions and tools. Replies are generated through
//! the audio-capable chat completions endpoint with the same voice.

use super::{BackendError, ModelBackend, Reply, MAX_TOOL_ROUNDS};
use crate::tools::ToolSet;
use async_trait::async_trait;
use base64::Engine;
use friday_types::{ApiKey, ProviderId, RealtimeVoiceConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Chat model that accepts audio output for generated replies.
pub const REPLY_AUDIO_MODEL: &str = "gpt-4o-audio-preview";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct RealtimeSession {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Value,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    id: String,
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Default, Deserialize)]
struct AudioOutput {
    #[serde(default)]
    data: String,
    #[serde(default)]
    transcript: String,
}

/// Realtime speech-to-speech model hosted by OpenAI.
#[derive(Debug)]
pub struct OpenAiRealtime {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
    config: RealtimeVoiceConfig,
    instructions: Option<String>,
    session_id: Option<String>,
}

impl OpenAiRealtime {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: ApiKey,
        config: RealtimeVoiceConfig,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            config,
            instructions: None,
            session_id: None,
        }
    }

    /// Identifier of the realtime session created by [`ModelBackend::open`].
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(self.api_key.expose())
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                provider: ProviderId::OpenAi,
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

fn invalid(message: impl Into<String>) -> BackendError {
    BackendError::InvalidResponse {
        provider: ProviderId::OpenAi,
        message: message.into(),
    }
}

/// Tool definitions in the realtime session format.
fn realtime_tools(tools: &ToolSet) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "name": tool.name(),
                "description": tool.description(),
                "parameters": tool.parameters(),
            })
        })
        .collect()
}

/// Tool definitions in the chat completions format.
fn chat_tools(tools: &ToolSet) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters(),
                }
            })
        })
        .collect()
}

#[async_trait]
impl ModelBackend for OpenAiRealtime {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn open(&mut self, instructions: &str, tools: &ToolSet) -> Result<(), BackendError> {
        let body = json!({
            "model": self.config.model,
            "voice": self.config.voice,
            "temperature": self.config.temperature,
            "instructions": instructions,
            "modalities": ["audio", "text"],
            "tools": realtime_tools(tools),
        });

        let session: RealtimeSession = serde_json::from_value(
            self.post("/v1/realtime/sessions", &body).await?,
        )
        .map_err(|e| invalid(e.to_string()))?;

        info!(
            session_id = %session.id,
            model = %self.config.model,
            voice = %self.config.voice,
            "opened realtime session"
        );

        self.session_id = Some(session.id);
        self.instructions = Some(instructions.to_string());
        Ok(())
    }

    async fn respond(&self, prompt: &str, tools: &ToolSet) -> Result<Reply, BackendError> {
        let instructions = self
            .instructions
            .as_deref()
            .ok_or(BackendError::NotOpen(ProviderId::OpenAi))?;

        let mut messages = vec![
            json!({"role": "system", "content": instructions}),
            json!({"role": "system", "content": prompt}),
        ];
        let tool_defs = chat_tools(tools);

        for round in 0..MAX_TOOL_ROUNDS {
            let mut body = json!({
                "model": REPLY_AUDIO_MODEL,
                "modalities": ["text", "audio"],
                "audio": {"voice": self.config.voice, "format": "wav"},
                "temperature": self.config.temperature,
                "messages": messages,
            });
            if !tool_defs.is_empty() {
                body["tools"] = Value::Array(tool_defs.clone());
            }

            let completion: ChatCompletion =
                serde_json::from_value(self.post("/v1/chat/completions", &body).await?)
                    .map_err(|e| invalid(e.to_string()))?;
            let message = completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| invalid("response has no choices"))?;

            let calls: Vec<ToolCall> = match message.get("tool_calls") {
                Some(Value::Array(_)) => serde_json::from_value(message["tool_calls"].clone())
                    .map_err(|e| invalid(e.to_string()))?,
                _ => Vec::new(),
            };

            if calls.is_empty() {
                return reply_from_message(&message);
            }

            debug!(round, calls = calls.len(), "model requested tool calls");
            messages.push(message);
            for call in calls {
                let args = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| json!({}));
                let output = tools.invoke(&call.function.name, args).await;
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": output,
                }));
            }
        }

        Err(invalid(format!(
            "tool calls did not settle within {} rounds",
            MAX_TOOL_ROUNDS
        )))
    }
}

fn reply_from_message(message: &Value) -> Result<Reply, BackendError> {
    let audio: AudioOutput = match message.get("audio") {
        Some(audio) if !audio.is_null() => {
            serde_json::from_value(audio.clone()).map_err(|e| invalid(e.to_string()))?
        }
        _ => AudioOutput::default(),
    };

    let text = if audio.transcript.is_empty() {
        message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    } else {
        audio.transcript
    };

    let pcm = if audio.data.is_empty() {
        None
    } else {
        let wav = base64::engine::general_purpose::STANDARD
            .decode(audio.data)
            .map_err(|e| invalid(format!("invalid audio encoding: {}", e)))?;
        Some(friday_voice::tts::wav_to_pcm(wav))
    };

    if text.is_empty() && pcm.is_none() {
        return Err(invalid("reply has neither text nor audio"));
    }

    Ok(Reply { text, audio: pcm })
}
