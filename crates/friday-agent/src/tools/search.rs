use super::{required_str, Tool, ToolError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of related results included in one answer.
const MAX_RELATED: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InstantAnswer {
    heading: String,
    answer: String,
    abstract_text: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RelatedTopic {
    text: String,
    #[serde(rename = "FirstURL")]
    first_url: String,
    /// Present on topic groups instead of `text`.
    topics: Vec<RelatedTopic>,
}

impl InstantAnswer {
    fn render(&self) -> Option<String> {
        let mut lines = Vec::new();

        if !self.answer.is_empty() {
            lines.push(self.answer.clone());
        }
        if !self.abstract_text.is_empty() {
            let heading = if self.heading.is_empty() {
                String::new()
            } else {
                format!("{}: ", self.heading)
            };
            lines.push(format!("{}{} ({})", heading, self.abstract_text, self.abstract_url));
        }

        let related = self
            .related_topics
            .iter()
            .flat_map(|topic| {
                if topic.topics.is_empty() {
                    std::slice::from_ref(topic)
                } else {
                    topic.topics.as_slice()
                }
            })
            .filter(|topic| !topic.text.is_empty())
            .take(MAX_RELATED);
        for topic in related {
            lines.push(format!("- {} ({})", topic.text, topic.first_url));
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// Web search through the DuckDuckGo instant answer API.
#[derive(Debug, Clone)]
pub struct SearchWeb {
    http: reqwest::Client,
    base_url: String,
}

impl SearchWeb {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Tool for SearchWeb {
    fn name(&self) -> &'static str {
        "search_web"
    }

    fn description(&self) -> &'static str {
        "Search the web and return a short summary of the top results."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "What to search for"}
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let query = required_str(&args, "query")?;

        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Status(response.status()));
        }

        let answer: InstantAnswer = response.json().await?;
        Ok(answer
            .render()
            .unwrap_or_else(|| format!("No results found for '{}'.", query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_abstract_and_flattened_topics() {
        let answer: InstantAnswer = serde_json::from_value(json!({
            "Heading": "Rust",
            "AbstractText": "A systems programming language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
            "RelatedTopics": [
                {"Text": "Cargo", "FirstURL": "https://duckduckgo.com/Cargo"},
                {"Name": "Group", "Topics": [
                    {"Text": "Crates.io", "FirstURL": "https://duckduckgo.com/Crates"}
                ]}
            ]
        }))
        .unwrap();

        let rendered = answer.render().unwrap();
        assert!(rendered.starts_with("Rust: A systems programming language."));
        assert!(rendered.contains("- Cargo (https://duckduckgo.com/Cargo)"));
        assert!(rendered.contains("- Crates.io"));
    }

    #[test]
    fn empty_answer_renders_nothing() {
        let answer: InstantAnswer = serde_json::from_value(json!({})).unwrap();
        assert!(answer.render().is_none());
    }
}
