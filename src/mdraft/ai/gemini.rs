use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompts::{self, ContinueDirection, SummaryLength, TopicLength};
use super::TextGenerator;
use crate::error::{MdraftError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GENERATION_FAILED: &str = "Failed to generate text. Please try again.";

/// Gemini-backed [`TextGenerator`]. One configured client is meant to be
/// built per session and reused across calls.
///
/// Any backend fault surfaces as the same generic generation failure; the
/// underlying cause goes to the log only.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{API_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| {
                tracing::error!(%err, model = %self.model, "generation request failed");
                MdraftError::Generation(GENERATION_FAILED.to_string())
            })?;

        let body: GenerateContentResponse = response.json().await.map_err(|err| {
            tracing::error!(%err, "malformed generation response");
            MdraftError::Generation(GENERATION_FAILED.to_string())
        })?;

        let text: String = body
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            tracing::error!("generation response carried no text");
            return Err(MdraftError::Generation(GENERATION_FAILED.to_string()));
        }
        Ok(text)
    }

    /// Improve or modify existing text.
    pub async fn improve_text(&self, text: &str, instruction: &str) -> Result<String> {
        self.generate_text(&prompts::improve_prompt(text, instruction))
            .await
    }

    /// Generate a section from a topic or title.
    pub async fn generate_from_topic(&self, topic: &str, length: TopicLength) -> Result<String> {
        self.generate_text(&prompts::topic_prompt(topic, length))
            .await
    }

    /// Continue writing from existing text.
    pub async fn continue_writing(
        &self,
        existing: &str,
        direction: ContinueDirection,
    ) -> Result<String> {
        self.generate_text(&prompts::continue_prompt(existing, direction))
            .await
    }

    pub async fn summarize_text(&self, text: &str, length: SummaryLength) -> Result<String> {
        self.generate_text(&prompts::summarize_prompt(text, length))
            .await
    }

    pub async fn rewrite_text(&self, text: &str, tone: &str) -> Result<String> {
        self.generate_text(&prompts::rewrite_prompt(text, tone))
            .await
    }

    /// Cheap probe for whether the configured key works at all.
    pub async fn validate_api_key(&self) -> bool {
        self.generate_text("Hello").await.is_ok()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_text(prompt).await
    }
}
