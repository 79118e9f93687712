//! Readability rewrite.

use super::{Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::READABILITY;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{parse_json_object, str_field, strip_code_fences};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Title placed in prompts when the caller gives none.
pub(crate) const UNTITLED: &str = "Untitled post";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityResult {
    pub improved_content: String,
}

pub struct ReadabilityAgent {
    agent: PromptAgent,
}

impl ReadabilityAgent {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            agent: PromptAgent::new("readability", completion, prompts, READABILITY)?,
        })
    }

    /// Rewrite `content` for readability. On failure the content comes back unchanged.
    #[instrument(skip(self, content), fields(chars = content.len()))]
    pub async fn improve(&self, content: &str, title: Option<&str>) -> Outcome<ReadabilityResult> {
        let unchanged = || ReadabilityResult {
            improved_content: content.to_string(),
        };

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);
        let Some(response) = self
            .agent
            .run_with(&[("title", title.to_string()), ("content", content.to_string())])
            .await
        else {
            return Outcome::degraded(unchanged(), self.agent.missing_reason());
        };

        match rewritten_text(&response, "improved_content") {
            Some(improved_content) => Outcome::Ok(ReadabilityResult { improved_content }),
            None => {
                warn!(
                    component = "readability",
                    "Rewrite was empty or malformed; returning original"
                );
                Outcome::degraded(unchanged(), Degradation::MalformedResponse)
            }
        }
    }
}

/// The rewritten post from a response that is either plain text or a JSON
/// object carrying it under `field`.
pub(crate) fn rewritten_text(response: &str, field: &str) -> Option<String> {
    let body = strip_code_fences(response);
    if body.starts_with('{') {
        if let Some(map) = parse_json_object(body) {
            return str_field(&map, field).filter(|text| !text.trim().is_empty());
        }
    }

    Some(body.to_string()).filter(|b| !b.is_empty())
}
