//! OpenAI chat-completions implementation.

use super::CompletionClient;
use crate::config::LlmSettings;
use crate::error::{Result, StrideError};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-backed completion client.
pub struct OpenAICompletion {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAICompletion {
    /// Create a client for the given key and model.
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        Self::from_settings(
            api_key,
            &LlmSettings {
                model: model.to_string(),
                ..LlmSettings::default()
            },
        )
    }

    /// Create a client from LLM settings.
    pub fn from_settings(api_key: &str, settings: &LlmSettings) -> Result<Self> {
        let client =
            create_client_with_timeout(api_key, Duration::from_secs(settings.timeout_seconds))?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAICompletion {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()
                .map_err(|e| StrideError::Completion(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| StrideError::Completion(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| StrideError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| StrideError::Completion("Empty response from LLM".to_string()))?
            .clone();

        debug!("Completion returned {} chars", content.len());
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
