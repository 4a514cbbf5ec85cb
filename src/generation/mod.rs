//! Post generation: prompt construction and the provider seam.

pub mod openai;

pub use openai::OpenAiClient;

use anyhow::Result;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 250;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// One call to the text-generation provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Anything that can turn a prompt into generated text.
///
/// Errors are provider failures; callers never retry them.
#[async_trait::async_trait]
pub trait PostGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Model parameters applied to every generation request
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationSettings {
    pub fn request_for(&self, article: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: build_prompt(article),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

pub fn build_prompt(article: &str) -> String {
    format!(
        "Transform the following article into a short post.\n\
         Start with an engaging hook and summarize the key points succinctly.\n\
         \n\
         Article:\n\
         {article}"
    )
}
