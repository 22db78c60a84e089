//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use siniestro_extraction::{InvokeError, Message, ModelInvoker, ModelResponse};

use crate::error::GeminiError;
use crate::types::{request_from_messages, GenerateContentResponse, GenerationConfig};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for one Gemini model, usable as a [`ModelInvoker`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    /// Creates a client for the given model and API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
        }
    }

    /// Overrides the API base URL (for proxies and test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The model name this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one `generateContent` request and returns the first candidate's
    /// concatenated text.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError` on transport failure, non-success status, a
    /// blocked prompt, or a response without text candidates.
    pub async fn generate(&self, messages: &[Message]) -> Result<String, GeminiError> {
        let generation_config = self.temperature.map(|temperature| GenerationConfig {
            temperature: Some(temperature),
            response_mime_type: None,
        });
        let request = request_from_messages(messages, generation_config);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        tracing::debug!(model = %self.model, contents = request.contents.len(), "calling generateContent");
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Err(GeminiError::BlockedPrompt(reason));
        }

        let text: String = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyCandidates);
        }

        Ok(text)
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn invoke(&self, messages: &[Message]) -> Result<ModelResponse, InvokeError> {
        let content = self.generate(messages).await.map_err(InvokeError::new)?;
        Ok(ModelResponse::Rich {
            content,
            model: Some(self.model.clone()),
        })
    }
}
