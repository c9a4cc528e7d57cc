// src/services/completion.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const SYSTEM_INSTRUCTION: &str = "You are a DIY expert assistant who gives concise, helpful, and practical advice. Focus on safety, best practices, and step-by-step solutions. Format your responses with clear structure using markdown formatting where appropriate. Break complex processes into numbered steps. Highlight safety warnings in bold.";

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";
pub const DEFAULT_APP_TITLE: &str = "DIY Assistant";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote reported an error: {0}")]
    Remote(String),

    #[error("remote returned status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("completion task failed: {0}")]
    Task(String),
}

impl CompletionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Transport(_) => "transport",
            CompletionError::Remote(_) => "remote",
            CompletionError::Status(_) => "status",
            CompletionError::Malformed(_) => "malformed",
            CompletionError::Task(_) => "task",
        }
    }
}

/// The remote language model. `Ok(None)` means the call succeeded but the
/// first choice carried no content.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, utterance: &str) -> Result<Option<String>, CompletionError>;
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub site_origin: String,
    pub app_title: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            site_origin: "http://localhost:3000".to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn for_utterance(config: &CompletionConfig, utterance: &str) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: utterance.to_string(),
                },
            ],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pulls the reply out of a raw response body. An `error` field wins over
/// the HTTP status; a non-2xx without one is reported by status.
pub fn parse_completion(status: u16, body: &[u8]) -> Result<Option<String>, CompletionError> {
    let parsed: CompletionResponse = serde_json::from_slice(body)?;

    if let Some(error) = parsed.error.filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(CompletionError::Remote(message));
    }

    if !(200..300).contains(&status) {
        return Err(CompletionError::Status(status));
    }

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|content| !content.is_empty()))
}

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: Client,
    config: CompletionConfig,
}

impl OpenRouterClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, utterance: &str) -> Result<Option<String>, CompletionError> {
        let body = CompletionRequest::for_utterance(&self.config, utterance);

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header("HTTP-Referer", &self.config.site_origin)
            .header("X-Title", &self.config.app_title)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        debug!(status, len = bytes.len(), "completion response received");

        parse_completion(status, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_system_and_user_turns() {
        let req = CompletionRequest::for_utterance(&CompletionConfig::default(), "fix a door");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "fix a door");
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn error_field_is_a_failure() {
        let body = br#"{"error":{"message":"No auth credentials found","code":401}}"#;
        let err = parse_completion(401, body).unwrap_err();
        assert!(matches!(err, CompletionError::Remote(ref m) if m == "No auth credentials found"));
    }

    #[test]
    fn missing_choices_is_empty_success() {
        assert_eq!(parse_completion(200, br#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(
            parse_completion(200, br#"{"choices":[{"message":{"content":""}}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_completion(502, b"<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn bad_status_without_error_field() {
        let err = parse_completion(500, br#"{}"#).unwrap_err();
        assert!(matches!(err, CompletionError::Status(500)));
    }

    #[test]
    fn first_choice_content_is_returned() {
        let body = br#"{"choices":[{"message":{"role":"assistant","content":"Use a wrench."}},{"message":{"content":"other"}}]}"#;
        assert_eq!(
            parse_completion(200, body).unwrap().as_deref(),
            Some("Use a wrench.")
        );
    }
}
