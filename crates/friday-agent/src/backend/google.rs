//! Gemini chat backend with Google Cloud text-to-speech.

use super::{BackendError, ModelBackend, Reply, MAX_TOOL_ROUNDS};
use crate::config::EndpointConfig;
use crate::tools::ToolSet;
use async_trait::async_trait;
use friday_types::{ApiKey, ChatSpeechConfig, ProviderId};
use friday_voice::TtsService;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

/// Gemini chat model paired with a separate hosted voice.
#[derive(Debug)]
pub struct GeminiChat {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
    config: ChatSpeechConfig,
    tts: Option<TtsService>,
    instructions: Option<String>,
}

impl GeminiChat {
    pub fn new(
        http: reqwest::Client,
        endpoints: &EndpointConfig,
        api_key: ApiKey,
        config: ChatSpeechConfig,
    ) -> Self {
        let tts = config.speech.clone().map(|speech| {
            TtsService::new(
                http.clone(),
                endpoints.google_tts.as_str(),
                api_key.expose(),
                speech,
            )
        });

        Self {
            http,
            base_url: endpoints.google.trim_end_matches('/').to_string(),
            api_key,
            config,
            tts,
            instructions: None,
        }
    }

    async fn generate(&self, body: &Value) -> Result<GenerateContentResponse, BackendError> {
        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.config.model
            ))
            .query(&[("key", self.api_key.expose())])
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                provider: ProviderId::Google,
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

fn invalid(message: impl Into<String>) -> BackendError {
    BackendError::InvalidResponse {
        provider: ProviderId::Google,
        message: message.into(),
    }
}

fn function_declarations(tools: &ToolSet) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name(),
                "description": tool.description(),
                "parameters": tool.parameters(),
            })
        })
        .collect()
}

#[async_trait]
impl ModelBackend for GeminiChat {
    fn provider(&self) -> ProviderId {
        ProviderId::Google
    }

    async fn open(&mut self, instructions: &str, tools: &ToolSet) -> Result<(), BackendError> {
        info!(
            model = %self.config.model,
            voice = self.tts.as_ref().map(TtsService::voice).unwrap_or("none"),
            tools = tools.names().len(),
            "chat session ready"
        );
        self.instructions = Some(instructions.to_string());
        Ok(())
    }

    async fn respond(&self, prompt: &str, tools: &ToolSet) -> Result<Reply, BackendError> {
        let instructions = self
            .instructions
            .as_deref()
            .ok_or(BackendError::NotOpen(ProviderId::Google))?;

        let mut contents = vec![json!({"role": "user", "parts": [{"text": prompt}]})];
        let declarations = function_declarations(tools);

        for round in 0..MAX_TOOL_ROUNDS {
            let mut body = json!({
                "systemInstruction": {"parts": [{"text": instructions}]},
                "contents": contents,
            });
            if !declarations.is_empty() {
                body["tools"] = json!([{"functionDeclarations": declarations}]);
            }

            let content = self
                .generate(&body)
                .await?
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .ok_or_else(|| invalid("response has no candidates"))?;

            let parts: Vec<Part> =
                serde_json::from_value(content.get("parts").cloned().unwrap_or_else(|| json!([])))
                    .map_err(|e| invalid(e.to_string()))?;

            let calls: Vec<&GeminiFunctionCall> = parts
                .iter()
                .filter_map(|part| part.function_call.as_ref())
                .collect();

            if calls.is_empty() {
                let text = parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
                    .trim()
                    .to_string();
                if text.is_empty() {
                    return Err(invalid("reply has no text"));
                }

                let audio = match &self.tts {
                    Some(tts) => Some(tts.synthesize(&text).await?),
                    None => None,
                };
                return Ok(Reply { text, audio });
            }

            debug!(round, calls = calls.len(), "model requested function calls");
            let mut responses = Vec::with_capacity(calls.len());
            for call in calls {
                let output = tools.invoke(&call.name, call.args.clone()).await;
                responses.push(json!({
                    "functionResponse": {
                        "name": call.name,
                        "response": {"result": output},
                    }
                }));
            }
            contents.push(content);
            contents.push(json!({"role": "user", "parts": responses}));
        }

        Err(invalid(format!(
            "function calls did not settle within {} rounds",
            MAX_TOOL_ROUNDS
        )))
    }
}
