use super::{GenerationRequest, PostGenerator};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// `http` should carry the outbound timeout
    pub fn new(http: reqwest::Client, api_key: String, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(anyhow!("OPENAI_API_KEY empty"));
        }

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait::async_trait]
impl PostGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let start = Instant::now();

        let req = ChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("openai request")?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            let snippet: String = body.chars().take(800).collect();
            return Err(anyhow!("openai {}: {}", status.as_u16(), snippet));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).context("openai json parse")?;
        let content = extract_content(parsed)?;

        debug!(
            model = %request.model,
            latency_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Generation completed"
        );

        Ok(content)
    }
}

fn extract_content(parsed: ChatCompletionResponse) -> Result<String> {
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .map(|m| m.content)
        .ok_or_else(|| anyhow!("no response from provider"))
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    pub message: Option<ChatMessageOut>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessageOut {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_rejected() {
        let http = reqwest::Client::new();
        assert!(OpenAiClient::new(http, "  ".to_string(), DEFAULT_BASE_URL).is_err());
    }

    #[test]
    fn endpoint_joins_base_url() {
        let http = reqwest::Client::new();
        let client =
            OpenAiClient::new(http, "sk-test".to_string(), "http://localhost:9999/v1/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn parse_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hook!"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "Hook!");
    }

    #[test]
    fn parse_empty_choices_is_error() {
        let parsed: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(parsed).is_err());
    }
}
