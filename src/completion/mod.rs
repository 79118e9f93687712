//! Completion capability: send a prompt, get text back.
//!
//! The capability is optional. When no credential is configured the pipeline
//! runs with `None` and every agent falls back to its static output.

mod mock;
mod openai;

pub use mock::MockCompletion;
pub use openai::OpenAICompletion;

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Trait for chat-completion providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the model's text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logging and diagnostics.
    fn model(&self) -> &str;
}

/// Shared handle to a completion provider that may be disabled.
pub type Completion = Option<Arc<dyn CompletionClient>>;

/// Build the completion capability from settings.
///
/// A missing credential or a client that fails to build yields `None`
/// instead of an error.
pub fn initialize(settings: &Settings) -> Completion {
    let Some(api_key) = settings.api_key() else {
        warn!(
            component = "completion",
            "{} is not set; content generation will use fallbacks",
            settings.llm.api_key_env
        );
        return None;
    };

    match OpenAICompletion::from_settings(&api_key, &settings.llm) {
        Ok(client) => {
            info!(component = "completion", model = %settings.llm.model, "Completion enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(component = "completion", error = %e, "Completion client unavailable");
            None
        }
    }
}
