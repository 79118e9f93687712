//! Tone adjustment.

use super::readability::{rewritten_text, UNTITLED};
use super::{Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::TONE;
use crate::config::Prompts;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const DEFAULT_TONE: &str = "professional";

/// Supported tones and the guideline text sent to the model for each.
pub const TONES: &[(&str, &str)] = &[
    (
        "professional",
        "Use a clear, polished and objective voice. Prefer precise terms, complete sentences and a confident but measured register. Avoid slang and exclamation marks.",
    ),
    (
        "casual",
        "Write the way you would talk to a friend at the gym. Use contractions, short sentences and everyday words. Light humour is fine.",
    ),
    (
        "friendly",
        "Be warm and welcoming. Address the reader as \"you\", acknowledge that change is hard, and keep the language encouraging and inclusive.",
    ),
    (
        "motivational",
        "Energise the reader. Use active verbs, direct calls to action and vivid language about progress and achievement without overpromising results.",
    ),
    (
        "educational",
        "Teach step by step. Define terms when they first appear, explain the reasoning behind each recommendation and use examples to make ideas concrete.",
    ),
    (
        "authoritative",
        "Write as a subject-matter expert. Be decisive, reference established research and guidelines, and state recommendations plainly.",
    ),
];

/// Guideline text for `tone`, matched case-insensitively. Unknown tones get
/// the professional guideline.
pub fn tone_guideline(tone: &str) -> &'static str {
    let wanted = tone.trim().to_lowercase();
    TONES
        .iter()
        .find(|(name, _)| *name == wanted)
        .or_else(|| TONES.iter().find(|(name, _)| *name == DEFAULT_TONE))
        .map(|(_, guideline)| *guideline)
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneResult {
    pub adjusted_content: String,
    /// The tone as the caller spelled it.
    pub target_tone: String,
}

pub struct ToneAgent {
    agent: PromptAgent,
}

impl ToneAgent {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            agent: PromptAgent::new("tone", completion, prompts, TONE)?,
        })
    }

    /// Rewrite `content` in `target_tone`. On failure the content comes back unchanged.
    #[instrument(skip(self, content), fields(chars = content.len()))]
    pub async fn adjust(
        &self,
        content: &str,
        target_tone: &str,
        title: Option<&str>,
    ) -> Outcome<ToneResult> {
        let result = |adjusted_content: String| ToneResult {
            adjusted_content,
            target_tone: target_tone.to_string(),
        };

        let guideline = tone_guideline(target_tone);
        debug!(target_tone, "Using tone guideline");

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);
        let Some(response) = self
            .agent
            .run_with(&[
                ("title", title.to_string()),
                ("target_tone", target_tone.to_string()),
                ("tone_guidelines", guideline.to_string()),
                ("content", content.to_string()),
            ])
            .await
        else {
            return Outcome::degraded(result(content.to_string()), self.agent.missing_reason());
        };

        match rewritten_text(&response, "adjusted_content") {
            Some(adjusted) => Outcome::Ok(result(adjusted)),
            None => {
                warn!(
                    component = "tone",
                    "Rewrite was empty or malformed; returning original"
                );
                Outcome::degraded(result(content.to_string()), Degradation::MalformedResponse)
            }
        }
    }
}
