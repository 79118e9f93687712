//! Blog writer: outline, then the full post.

use super::{join_tags, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::BLOG_WRITER;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::strip_code_fences;
use crate::tools::{ContentPlanTool, Mindmap};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    /// Markdown post body.
    pub content: String,
    pub tags: Vec<String>,
    pub mindmap: Mindmap,
}

pub struct BlogWriterAgent {
    content_plan: ContentPlanTool,
    agent: PromptAgent,
}

impl BlogWriterAgent {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            content_plan: ContentPlanTool::new(completion.clone(), prompts.clone())?,
            agent: PromptAgent::new("blog_writer", completion, prompts, BLOG_WRITER)?,
        })
    }

    #[instrument(skip(self))]
    pub async fn generate(&self, topic: &str) -> Outcome<BlogDraft> {
        let outline_outcome = self.content_plan.plan(topic).await;
        let outline_reason = outline_outcome.reason();
        let mindmap = outline_outcome.into_payload();

        let response = self
            .agent
            .run_with(&[
                ("title", mindmap.title.clone()),
                ("description", mindmap.description.clone()),
                ("tags", join_tags(&mindmap.tags)),
                ("sections", mindmap.sections_outline()),
            ])
            .await;

        let draft = |content: String, mindmap: Mindmap| BlogDraft {
            title: mindmap.title.clone(),
            content,
            tags: mindmap.tags.clone(),
            mindmap,
        };

        match response {
            Some(text) => {
                let content = strip_code_fences(&text).trim().to_string();
                info!(chars = content.len(), "Draft generated");
                Outcome::Ok(draft(content, mindmap)).degrade_with(outline_reason)
            }
            None => {
                let content = mindmap.to_markdown();
                Outcome::degraded(draft(content, mindmap), self.agent.missing_reason())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Degradation;
    use crate::completion::{CompletionClient, MockCompletion};

    #[tokio::test]
    async fn test_disabled_draft_is_skeleton() {
        let agent = BlogWriterAgent::new(None, Arc::new(Prompts::default())).unwrap();
        let outcome = agent.generate("Walking").await;

        assert_eq!(outcome.reason(), Some(Degradation::CompletionDisabled));
        let draft = outcome.into_payload();
        assert_eq!(draft.title, "The Complete Guide to Walking");
        assert!(draft.content.starts_with("# The Complete Guide to Walking"));
        assert_eq!(draft.tags, draft.mindmap.tags);
    }

    #[tokio::test]
    async fn test_writer_failure_after_outline() {
        let outline = r#"{"title": "Walk More", "description": "Steps add up.",
            "sections": ["Why walk"], "tags": ["walking"]}"#;
        let mock: Arc<dyn CompletionClient> = Arc::new(MockCompletion::scripted([outline, " "]));
        let agent = BlogWriterAgent::new(Some(mock), Arc::new(Prompts::default())).unwrap();
        let outcome = agent.generate("Walking").await;

        assert_eq!(outcome.reason(), Some(Degradation::NoResponse));
        let draft = outcome.into_payload();
        assert_eq!(draft.title, "Walk More");
        assert!(draft.content.contains("## Why walk"));
    }

    #[tokio::test]
    async fn test_fenced_post_is_unwrapped() {
        let outline =
            r#"{"title": "Walk More", "description": "d", "sections": ["s"], "tags": []}"#;
        let mock: Arc<dyn CompletionClient> = Arc::new(MockCompletion::scripted([
            outline,
            "```markdown\n# Walk More\n\nBody\n```",
        ]));
        let agent = BlogWriterAgent::new(Some(mock), Arc::new(Prompts::default())).unwrap();
        let outcome = agent.generate("Walking").await;

        assert!(outcome.is_ok());
        assert_eq!(outcome.payload().content, "# Walk More\n\nBody");
        assert!(outcome.payload().tags.is_empty());
    }
}
