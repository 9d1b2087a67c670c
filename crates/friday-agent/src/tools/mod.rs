//! Tools the assistant can call during a conversation.
//!
//! Every assistant carries the same fixed, ordered tool set regardless of
//! which provider was selected.

pub mod email;
pub mod search;
pub mod weather;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use email::{MailCredentials, SendEmail};
pub use search::SearchWeb;
pub use weather::GetWeather;

/// Errors raised by a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Unavailable(String),

    #[error("email delivery failed: {0}")]
    Mail(String),
}

/// A capability the model can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;

    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

/// Extracts a required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing string field '{}'", key)))
}

/// Fixed, ordered list of tools attached to an assistant.
#[derive(Debug, Clone)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

/// Endpoints and credentials used to build the standard tool set.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub weather_url: String,
    pub search_url: String,
    pub mail: Option<MailCredentials>,
}

impl ToolSet {
    /// The standard tools: weather lookup, web search, email.
    pub fn standard(http: reqwest::Client, settings: ToolSettings) -> Self {
        Self::from_tools(vec![
            Arc::new(GetWeather::new(http.clone(), settings.weather_url)),
            Arc::new(SearchWeb::new(http, settings.search_url)),
            Arc::new(SendEmail::new(settings.mail)),
        ])
    }

    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Calls a tool by name and renders the outcome for the model.
    ///
    /// Failures become a message the model can relay; they never end the
    /// conversation.
    pub async fn invoke(&self, name: &str, args: Value) -> String {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = name, "model requested an unknown tool");
            return format!("Unknown tool '{}'.", name);
        };

        match tool.call(args).await {
            Ok(output) => {
                tracing::info!(tool = name, "tool call succeeded");
                output
            }
            Err(e) => {
                tracing::warn!(tool = name, "tool call failed: {}", e);
                format!("An error occurred while running {}: {}", name, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes its input."
        }

        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn call(&self, args: Value) -> Result<String, ToolError> {
            Ok(required_str(&args, "text")?.to_string())
        }
    }

    fn settings() -> ToolSettings {
        ToolSettings {
            weather_url: "http://127.0.0.1:9".to_string(),
            search_url: "http://127.0.0.1:9".to_string(),
            mail: None,
        }
    }

    #[test]
    fn standard_set_has_fixed_order() {
        let tools = ToolSet::standard(reqwest::Client::new(), settings());
        assert_eq!(tools.names(), vec!["get_weather", "search_web", "send_email"]);
        for tool in tools.iter() {
            assert_eq!(tool.parameters()["type"], "object");
        }
    }

    #[tokio::test]
    async fn invoke_renders_errors_for_the_model() {
        let tools = ToolSet::from_tools(vec![Arc::new(Echo)]);

        assert_eq!(tools.invoke("echo", json!({"text": "hi"})).await, "hi");

        let missing = tools.invoke("echo", json!({})).await;
        assert!(missing.starts_with("An error occurred while running echo"));

        let unknown = tools.invoke("nope", json!({})).await;
        assert_eq!(unknown, "Unknown tool 'nope'.");
    }
}
