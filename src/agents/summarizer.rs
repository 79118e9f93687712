//! Post summaries.

use super::readability::UNTITLED;
use super::{Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::SUMMARIZER;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{parse_json_object, str_field, string_list_field};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SummaryResult {
    pub summary: String,
    pub keywords: Vec<String>,
}

pub struct SummarizerAgent {
    agent: PromptAgent,
}

impl SummarizerAgent {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            agent: PromptAgent::new("summarizer", completion, prompts, SUMMARIZER)?,
        })
    }

    /// Summary and keywords. Any failure yields an empty summary and no keywords.
    #[instrument(skip(self, content), fields(chars = content.len()))]
    pub async fn summarize(&self, title: &str, content: &str) -> Outcome<SummaryResult> {
        let title = Some(title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);
        let Some(response) = self
            .agent
            .run_with(&[("title", title.to_string()), ("content", content.to_string())])
            .await
        else {
            return Outcome::degraded(SummaryResult::default(), self.agent.missing_reason());
        };

        let parsed = parse_json_object(&response).and_then(|map| {
            let summary = str_field(&map, "summary");
            let keywords = string_list_field(&map, "keywords");
            if summary.is_none() && keywords.is_none() {
                return None;
            }
            Some(SummaryResult {
                summary: summary.unwrap_or_default(),
                keywords: keywords.unwrap_or_default(),
            })
        });

        match parsed {
            Some(result) => Outcome::Ok(result),
            None => {
                warn!(
                    component = "summarizer",
                    "Summary response was not usable JSON"
                );
                Outcome::degraded(SummaryResult::default(), Degradation::MalformedResponse)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};

    fn agent(reply: Option<&str>) -> SummarizerAgent {
        let completion =
            reply.map(|r| Arc::new(MockCompletion::replying(r)) as Arc<dyn CompletionClient>);
        SummarizerAgent::new(completion, Arc::new(Prompts::default())).unwrap()
    }

    #[tokio::test]
    async fn test_summary_in_prose() {
        let reply =
            r#"Here you go: {"summary": "Walk daily.", "keywords": ["walking", "steps"]} Enjoy!"#;
        let outcome = agent(Some(reply))
            .summarize("Walking", "Walk every day.")
            .await;

        assert!(outcome.is_ok());
        assert_eq!(
            outcome.into_payload(),
            SummaryResult {
                summary: "Walk daily.".to_string(),
                keywords: vec!["walking".to_string(), "steps".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_failures_are_empty() {
        let disabled = agent(None).summarize("t", "c").await;
        assert_eq!(disabled.reason(), Some(Degradation::CompletionDisabled));
        assert_eq!(disabled.into_payload(), SummaryResult::default());

        let prose = agent(Some("A fine post about walking."))
            .summarize("t", "c")
            .await;
        assert_eq!(prose.reason(), Some(Degradation::MalformedResponse));
        assert_eq!(prose.into_payload(), SummaryResult::default());

        let wrong_shape = agent(Some(r#"{"answer": 42}"#)).summarize("t", "c").await;
        assert_eq!(wrong_shape.reason(), Some(Degradation::MalformedResponse));
    }

    #[tokio::test]
    async fn test_missing_keywords_default_empty() {
        let outcome = agent(Some(r#"{"summary": "Short."}"#))
            .summarize("t", "c")
            .await;
        assert!(outcome.is_ok());
        assert!(outcome.payload().keywords.is_empty());
    }
}
