use crate::error::{AssistantError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Connection and model settings for the chat API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub summary_model: String,
    pub chat_model: String,
    /// Characters of function code sent for summarization
    pub max_snippet_chars: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mistral.ai/v1".to_string(),
            api_key_env: "MISTRAL_API_KEY".to_string(),
            summary_model: "codestral-latest".to_string(),
            chat_model: "mistral-large-latest".to_string(),
            max_snippet_chars: 1500,
        }
    }
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
///
/// Mistral's API is the default; OpenAI, Ollama and vLLM speak the same protocol.
pub struct ChatClient {
    api_key: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: Client::new(),
        }
    }

    /// Build a client, reading the key from `config.api_key_env`
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AssistantError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::new(&config.base_url, api_key))
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send one user prompt, optionally preceded by a system message
    pub async fn complete(&self, model: &str, system: Option<&str>, prompt: &str) -> Result<String> {
        let request = build_request(model, system, prompt, self.max_tokens);
        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json");
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        log::debug!("POST {url} (model {model}, {} prompt chars)", prompt.len());
        let response = req.json(&request).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AssistantError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        first_content(body)
    }
}

fn build_request(model: &str, system: Option<&str>, prompt: &str, max_tokens: u32) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: prompt.to_string(),
    });
    ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens: Some(max_tokens),
    }
}

fn first_content(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(AssistantError::EmptyResponse)
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn trailing_slash_removed() {
        let client = ChatClient::new("https://api.example.com/v1/", "key");
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn missing_key_names_the_variable() {
        let config = AssistantConfig {
            api_key_env: "OWLSET_TEST_KEY_NEVER_SET".to_string(),
            ..AssistantConfig::default()
        };
        let err = ChatClient::from_config(&config).err().unwrap();
        assert!(matches!(err, AssistantError::MissingApiKey(var) if var == "OWLSET_TEST_KEY_NEVER_SET"));
    }

    #[test]
    fn request_puts_system_message_first() {
        let request = build_request("codestral-latest", Some("be brief"), "hi", 64);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "codestral-latest",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 64
            })
        );
    }

    #[test]
    fn blank_or_missing_choices_are_empty_responses() {
        let body: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(first_content(body), Err(AssistantError::EmptyResponse)));

        let body: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "  \n"}}]
        }))
        .unwrap();
        assert!(matches!(first_content(body), Err(AssistantError::EmptyResponse)));

        let body: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": " Adds one. "}}]
        }))
        .unwrap();
        assert_eq!(first_content(body).unwrap(), "Adds one.");
    }

    #[test]
    fn defaults_target_mistral() {
        let config = AssistantConfig::default();
        assert_eq!(config.base_url, "https://api.mistral.ai/v1");
        assert_eq!(config.summary_model, "codestral-latest");
        assert_eq!(config.chat_model, "mistral-large-latest");
        assert_eq!(config.max_snippet_chars, 1500);
    }
}
