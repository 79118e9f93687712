//! Specialized agents.
//!
//! Each agent binds one prompt template to the completion capability and
//! returns a fixed-shape [`Outcome`]. Agents never fail past their own
//! boundary: every provider or parse failure becomes a degraded payload.

mod engagement;
mod outcome;
mod planner;
mod prompt;
mod readability;
mod summarizer;
mod tone;
mod topics;
mod writer;

pub use engagement::{EngagementAgent, EngagementRequest, EngagementResult};
pub use outcome::{Degradation, Outcome};
pub use planner::{BlogPlan, BlogPlannerAgent};
pub use prompt::PromptAgent;
pub use readability::{ReadabilityAgent, ReadabilityResult};
pub use summarizer::{SummarizerAgent, SummaryResult};
pub use tone::{tone_guideline, ToneAgent, ToneResult, DEFAULT_TONE, TONES};
pub use topics::{
    fallback_topics, TopicList, TopicRequest, TopicSuggestion, TopicSuggestionAgent,
};
pub use writer::{BlogDraft, BlogWriterAgent};

/// Comma-separated tags for prompts.
pub(crate) fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}
