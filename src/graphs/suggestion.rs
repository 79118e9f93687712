//! Suggestion graph: engagement analysis, topic ideas and new section ideas
//! in one response.
//!
//! Topics are always suggested. Engagement and section ideas need content;
//! without it their fields hold empty defaults.

use crate::agents::{
    Degradation, EngagementAgent, EngagementRequest, Outcome, PromptAgent, TopicRequest,
    TopicSuggestion, TopicSuggestionAgent,
};
use crate::config::prompts::SECTION_IDEAS;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{extract_bracketed_array, str_field};
use crate::tools::{BlogAnalytics, Capabilities};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const SECTION_IDEA_COUNT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionAggregate {
    pub insights: String,
    pub suggested_tags: Vec<String>,
    pub improvements: String,
    pub analytics: Option<BlogAnalytics>,
    pub suggested_topics: Vec<TopicSuggestion>,
    pub new_section_ideas: Vec<String>,
}

pub struct SuggestionGraph {
    engagement: EngagementAgent,
    topics: TopicSuggestionAgent,
    section_ideas: PromptAgent,
}

impl SuggestionGraph {
    pub fn new(capabilities: &Capabilities, prompts: Arc<Prompts>) -> Result<Self> {
        let completion = capabilities.completion.clone();
        Ok(Self {
            engagement: EngagementAgent::new(
                completion.clone(),
                prompts.clone(),
                capabilities.similarity.clone(),
                capabilities.analytics.clone(),
                capabilities.similar_top_k,
            )?,
            topics: TopicSuggestionAgent::new(
                completion.clone(),
                prompts.clone(),
                capabilities.search.clone(),
                capabilities.search_results,
            )?,
            section_ideas: PromptAgent::new("section_ideas", completion, prompts, SECTION_IDEAS)?,
        })
    }

    #[instrument(skip(self, request), fields(has_content = request.content.is_some()))]
    pub async fn aggregate(&self, request: &SuggestionRequest) -> Outcome<SuggestionAggregate> {
        let mut aggregate = SuggestionAggregate::default();
        let mut reason: Option<Degradation> = None;
        let mut record = |r: Option<Degradation>| {
            if reason.is_none() {
                reason = r;
            }
        };

        let content = request
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if let Some(content) = content {
            let engagement = self
                .engagement
                .analyze(&EngagementRequest {
                    content: content.to_string(),
                    tags: request.tags.clone(),
                    blog_id: None,
                    comments: Vec::new(),
                })
                .await;
            record(engagement.reason());
            let engagement = engagement.into_payload();
            aggregate.insights = engagement.insights;
            aggregate.suggested_tags = engagement.suggested_tags;
            aggregate.improvements = engagement.improvements;
            aggregate.analytics = engagement.analytics;
        }

        let topics = self
            .topics
            .suggest(&TopicRequest {
                category: request.category.clone(),
                count: request.count,
                user_id: request.user_id.clone(),
            })
            .await;
        record(topics.reason());
        aggregate.suggested_topics = topics.into_payload();

        if let Some(content) = content {
            let ideas = self.new_section_ideas(content).await;
            record(ideas.reason());
            aggregate.new_section_ideas = ideas.into_payload();
        }

        info!(
            topics = aggregate.suggested_topics.len(),
            section_ideas = aggregate.new_section_ideas.len(),
            "Suggestions aggregated"
        );

        match reason {
            Some(reason) => Outcome::degraded(aggregate, reason),
            None => Outcome::Ok(aggregate),
        }
    }

    /// Section titles from a list the model is asked to return bare.
    async fn new_section_ideas(&self, content: &str) -> Outcome<Vec<String>> {
        let Some(response) = self
            .section_ideas
            .run_with(&[
                ("count", SECTION_IDEA_COUNT.to_string()),
                ("content", content.to_string()),
            ])
            .await
        else {
            return Outcome::degraded(Vec::new(), self.section_ideas.missing_reason());
        };

        let Some(items) = extract_bracketed_array(&response) else {
            warn!(
                component = "section_ideas",
                "No list in section ideas response"
            );
            return Outcome::degraded(Vec::new(), Degradation::MalformedResponse);
        };

        Outcome::Ok(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(map) => str_field(map, "title"),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};

    fn graph(mock: Option<Arc<MockCompletion>>) -> SuggestionGraph {
        let capabilities = Capabilities::offline(mock.map(|m| m as Arc<dyn CompletionClient>));
        SuggestionGraph::new(&capabilities, Arc::new(Prompts::default())).unwrap()
    }

    #[tokio::test]
    async fn test_no_arguments() {
        let outcome = graph(None).aggregate(&SuggestionRequest::default()).await;
        assert_eq!(outcome.reason(), Some(Degradation::CompletionDisabled));

        let aggregate = outcome.into_payload();
        assert!(!aggregate.suggested_topics.is_empty());
        assert!(aggregate.new_section_ideas.is_empty());
        assert_eq!(aggregate.insights, "");
        assert!(aggregate.suggested_tags.is_empty());
        assert_eq!(aggregate.improvements, "");
        assert!(aggregate.analytics.is_none());
    }

    #[tokio::test]
    async fn test_no_content_skips_content_branches() {
        let mock = Arc::new(MockCompletion::replying(r#"[{"title": "Topic A"}]"#));
        let outcome = graph(Some(mock.clone()))
            .aggregate(&SuggestionRequest {
                content: Some("   ".to_string()),
                count: Some(1),
                ..Default::default()
            })
            .await;

        assert!(outcome.is_ok());
        assert_eq!(mock.calls(), 1);
        assert_eq!(outcome.payload().suggested_topics[0].title, "Topic A");
    }

    #[tokio::test]
    async fn test_full_aggregate() {
        let mock = Arc::new(MockCompletion::scripted([
            r#"{"insights": "Good depth.", "suggested_tags": ["sleep"], "improvements": "Add a summary."}"#,
            r#"[{"title": "Naps", "category": "wellness"}]"#,
            r#"Ideas: ["Common Myths", "A Sample Evening Routine"]"#,
        ]));
        let outcome = graph(Some(mock))
            .aggregate(&SuggestionRequest {
                content: Some("Sleep is when recovery happens.".to_string()),
                tags: vec!["sleep".to_string()],
                category: Some("wellness".to_string()),
                count: Some(1),
                ..Default::default()
            })
            .await;

        assert!(outcome.is_ok());
        let aggregate = outcome.into_payload();
        assert_eq!(aggregate.insights, "Good depth.");
        assert_eq!(aggregate.suggested_topics.len(), 1);
        assert_eq!(
            aggregate.new_section_ideas,
            vec!["Common Myths", "A Sample Evening Routine"]
        );
    }

    #[tokio::test]
    async fn test_failing_branch_degrades_aggregate() {
        let mock = Arc::new(MockCompletion::scripted([
            r#"{"insights": "ok"}"#,
            r#"[{"title": "T"}]"#,
            "no list here",
        ]));
        let outcome = graph(Some(mock))
            .aggregate(&SuggestionRequest {
                content: Some("Body".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(outcome.reason(), Some(Degradation::MalformedResponse));
        assert!(outcome.payload().new_section_ideas.is_empty());
        assert_eq!(outcome.payload().insights, "ok");
    }
}
