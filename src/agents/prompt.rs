//! Base capability shared by every agent: one template bound to the completion client.

use super::Degradation;
use crate::completion::Completion;
use crate::config::Prompts;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A named template plus the (possibly disabled) completion client.
pub struct PromptAgent {
    component: &'static str,
    completion: Completion,
    prompts: Arc<Prompts>,
    template: String,
}

impl PromptAgent {
    /// Bind `template_name` to the completion client.
    ///
    /// Fails only when the template does not exist.
    pub fn new(
        component: &'static str,
        completion: Completion,
        prompts: Arc<Prompts>,
        template_name: &str,
    ) -> Result<Self> {
        let template = Self::load_template(&prompts, template_name)?.to_string();

        if completion.is_none() {
            debug!(component, "Completion disabled; agent will use fallbacks");
        }

        Ok(Self {
            component,
            completion,
            prompts,
            template,
        })
    }

    /// Read a named template from the store.
    pub fn load_template<'a>(prompts: &'a Prompts, name: &str) -> Result<&'a str> {
        prompts.template(name)
    }

    pub fn is_enabled(&self) -> bool {
        self.completion.is_some()
    }

    /// Render the bound template.
    pub fn render(&self, vars: &[(&str, String)]) -> String {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        self.prompts.render_with_custom(&self.template, &vars)
    }

    /// Send a prompt. `None` when disabled, on any error, or on blank output.
    pub async fn run(&self, prompt: &str) -> Option<String> {
        let client = self.completion.as_ref()?;

        match client.complete(prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                warn!(component = self.component, "Completion returned blank text");
                None
            }
            Err(e) => {
                warn!(component = self.component, error = %e, "Completion failed");
                None
            }
        }
    }

    /// Render the bound template and run it.
    pub async fn run_with(&self, vars: &[(&str, String)]) -> Option<String> {
        let prompt = self.render(vars);
        self.run(&prompt).await
    }

    /// Reason to report when [`PromptAgent::run`] produced nothing.
    pub fn missing_reason(&self) -> Degradation {
        if self.is_enabled() {
            Degradation::NoResponse
        } else {
            Degradation::CompletionDisabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};
    use crate::error::StrideError;

    fn prompts() -> Arc<Prompts> {
        Arc::new(Prompts::empty().with_template("greet", "Hello {name}"))
    }

    #[test]
    fn test_missing_template_fails_construction() {
        let result = PromptAgent::new("test", None, prompts(), "absent");
        assert!(matches!(result, Err(StrideError::TemplateNotFound(_))));
    }

    #[tokio::test]
    async fn test_disabled_returns_none() {
        let agent = PromptAgent::new("test", None, prompts(), "greet").unwrap();
        assert!(!agent.is_enabled());
        assert_eq!(agent.run("hi").await, None);
        assert_eq!(agent.missing_reason(), Degradation::CompletionDisabled);
    }

    #[tokio::test]
    async fn test_errors_are_swallowed() {
        let mock = Arc::new(MockCompletion::failing("timeout"));
        let client: Arc<dyn CompletionClient> = mock.clone();
        let agent = PromptAgent::new("test", Some(client), prompts(), "greet").unwrap();

        assert_eq!(agent.run_with(&[("name", "Ada".to_string())]).await, None);
        assert_eq!(mock.prompts(), vec!["Hello Ada"]);
        assert_eq!(agent.missing_reason(), Degradation::NoResponse);
    }

    #[tokio::test]
    async fn test_blank_reply_is_no_result() {
        let client: Arc<dyn CompletionClient> = Arc::new(MockCompletion::replying("   "));
        let agent = PromptAgent::new("test", Some(client), prompts(), "greet").unwrap();
        assert_eq!(agent.run("x").await, None);
    }

    #[tokio::test]
    async fn test_reply_is_returned() {
        let client: Arc<dyn CompletionClient> = Arc::new(MockCompletion::replying("Hi!"));
        let agent = PromptAgent::new("test", Some(client), prompts(), "greet").unwrap();
        assert_eq!(agent.run("x").await.as_deref(), Some("Hi!"));
    }
}
