//! Blog planner: outline plus a markdown writing plan.

use super::{join_tags, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::BLOG_PLANNER;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::strip_code_fences;
use crate::tools::content_plan::normalize_topic;
use crate::tools::{ContentPlanTool, Mindmap};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPlan {
    pub topic: String,
    pub mindmap: Mindmap,
    /// Markdown writing plan.
    pub outline: String,
}

pub struct BlogPlannerAgent {
    content_plan: ContentPlanTool,
    agent: PromptAgent,
}

impl BlogPlannerAgent {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            content_plan: ContentPlanTool::new(completion.clone(), prompts.clone())?,
            agent: PromptAgent::new("blog_planner", completion, prompts, BLOG_PLANNER)?,
        })
    }

    #[instrument(skip(self))]
    pub async fn plan(&self, topic: &str) -> Outcome<BlogPlan> {
        let topic = normalize_topic(topic).to_string();
        let outline_outcome = self.content_plan.plan(&topic).await;
        let outline_reason = outline_outcome.reason();
        let mindmap = outline_outcome.into_payload();

        let response = self
            .agent
            .run_with(&[
                ("topic", topic.clone()),
                ("title", mindmap.title.clone()),
                ("description", mindmap.description.clone()),
                ("tags", join_tags(&mindmap.tags)),
                ("sections", mindmap.sections_outline()),
            ])
            .await;

        match response {
            Some(text) => {
                let outline = strip_code_fences(&text).trim().to_string();
                Outcome::Ok(BlogPlan {
                    topic,
                    mindmap,
                    outline,
                })
                .degrade_with(outline_reason)
            }
            None => {
                let outline = mindmap.to_markdown();
                Outcome::degraded(
                    BlogPlan {
                        topic,
                        mindmap,
                        outline,
                    },
                    self.agent.missing_reason(),
                )
            }
        }
    }
}
