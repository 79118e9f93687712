//! Engagement analysis.
//!
//! Gathers analytics (when a blog id is given), similar posts and comment
//! sentiment, folds them into one prompt, and repairs the model's answer
//! field by field.

use super::{join_tags, Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::ENGAGEMENT;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{parse_json_object, str_field, string_list_field, truncate_chars};
use crate::tools::{AnalyticsStore, BlogAnalytics, SentimentTool, SimilarPost, SimilaritySearch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const MAX_INSIGHT_CHARS: usize = 500;
const MAX_SUGGESTED_TAGS: usize = 5;

const GENERIC_INSIGHTS: &str =
    "Engagement insights are unavailable right now. Posts with clear structure, practical takeaways and a strong call to action tend to perform best.";
const CANNED_IMPROVEMENTS: &str =
    "Add a compelling introduction, break long sections into scannable lists, include practical examples, and end with a clear call to action that invites comments.";
const DEFAULT_TAGS: &[&str] = &["health", "fitness", "wellness", "nutrition", "lifestyle"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blog_id: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementResult {
    pub insights: String,
    pub suggested_tags: Vec<String>,
    pub improvements: String,
    pub analytics: Option<BlogAnalytics>,
}

pub struct EngagementAgent {
    agent: PromptAgent,
    sentiment: SentimentTool,
    similarity: Arc<dyn SimilaritySearch>,
    analytics: Arc<dyn AnalyticsStore>,
    top_k: usize,
}

impl EngagementAgent {
    pub fn new(
        completion: Completion,
        prompts: Arc<Prompts>,
        similarity: Arc<dyn SimilaritySearch>,
        analytics: Arc<dyn AnalyticsStore>,
        top_k: usize,
    ) -> Result<Self> {
        Ok(Self {
            sentiment: SentimentTool::new(completion.clone(), prompts.clone())?,
            agent: PromptAgent::new("engagement", completion, prompts, ENGAGEMENT)?,
            similarity,
            analytics,
            top_k,
        })
    }

    #[instrument(skip(self, request), fields(blog_id = ?request.blog_id, tags = request.tags.len()))]
    pub async fn analyze(&self, request: &EngagementRequest) -> Outcome<EngagementResult> {
        let analytics = self.lookup_analytics(request.blog_id.as_deref()).await;
        let similar = self.lookup_similar(&request.tags).await;
        let sentiment = if request.comments.is_empty() {
            "No comments yet.".to_string()
        } else {
            self.sentiment.classify(&request.comments).await.describe()
        };

        let response = self
            .agent
            .run_with(&[
                ("tags", join_tags(&request.tags)),
                ("analytics", describe_analytics(analytics.as_ref())),
                ("similar_posts", describe_similar(&similar)),
                ("sentiment", sentiment),
                ("content", request.content.clone()),
            ])
            .await;

        let fallback_tags = || default_tags(&request.tags);

        let Some(response) = response else {
            return Outcome::degraded(
                EngagementResult {
                    insights: GENERIC_INSIGHTS.to_string(),
                    suggested_tags: fallback_tags(),
                    improvements: CANNED_IMPROVEMENTS.to_string(),
                    analytics,
                },
                self.agent.missing_reason(),
            );
        };

        let Some(map) = parse_json_object(&response) else {
            warn!(
                component = "engagement",
                "Engagement response was not JSON; using raw text"
            );
            return Outcome::degraded(
                EngagementResult {
                    insights: truncate_chars(response.trim(), MAX_INSIGHT_CHARS),
                    suggested_tags: fallback_tags(),
                    improvements: CANNED_IMPROVEMENTS.to_string(),
                    analytics,
                },
                Degradation::MalformedResponse,
            );
        };

        let insights = str_field(&map, "insights");
        let suggested_tags =
            string_list_field(&map, "suggested_tags").filter(|tags| !tags.is_empty());
        let improvements = str_field(&map, "improvements");

        if insights.is_none() && suggested_tags.is_none() && improvements.is_none() {
            warn!(
                component = "engagement",
                "Engagement response had none of the expected fields"
            );
            return Outcome::degraded(
                EngagementResult {
                    insights: GENERIC_INSIGHTS.to_string(),
                    suggested_tags: fallback_tags(),
                    improvements: CANNED_IMPROVEMENTS.to_string(),
                    analytics,
                },
                Degradation::MalformedResponse,
            );
        }

        Outcome::Ok(EngagementResult {
            insights: insights.unwrap_or_else(|| GENERIC_INSIGHTS.to_string()),
            suggested_tags: suggested_tags.unwrap_or_else(fallback_tags),
            improvements: improvements.unwrap_or_else(|| CANNED_IMPROVEMENTS.to_string()),
            analytics,
        })
    }

    async fn lookup_analytics(&self, blog_id: Option<&str>) -> Option<BlogAnalytics> {
        let blog_id = blog_id?;
        match self.analytics.get(blog_id).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(component = "engagement", error = %e, "Analytics lookup failed");
                None
            }
        }
    }

    async fn lookup_similar(&self, tags: &[String]) -> Vec<SimilarPost> {
        match self.similarity.query(tags, self.top_k).await {
            Ok(posts) => {
                debug!(count = posts.len(), "Similar posts");
                posts
            }
            Err(e) => {
                warn!(component = "engagement", error = %e, "Similarity lookup failed");
                Vec::new()
            }
        }
    }
}

/// First input tags, or the static defaults when there are none.
fn default_tags(tags: &[String]) -> Vec<String> {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .take(MAX_SUGGESTED_TAGS)
        .map(str::to_string)
        .collect();

    if tags.is_empty() {
        DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
    } else {
        tags
    }
}

fn describe_analytics(analytics: Option<&BlogAnalytics>) -> String {
    match analytics {
        Some(a) => format!(
            "{} views, {} likes, {} comments, {} shares, average read time {:.0}s",
            a.views, a.likes, a.comments, a.shares, a.average_read_time
        ),
        None => "Not available.".to_string(),
    }
}

fn describe_similar(posts: &[SimilarPost]) -> String {
    if posts.is_empty() {
        return "None found.".to_string();
    }
    posts
        .iter()
        .map(|p| {
            format!(
                "- {} (engagement {:.0}%, tags: {})",
                p.title,
                p.engagement * 100.0,
                p.tags.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};
    use crate::tools::{MemorySimilarityIndex, SimulatedAnalytics};

    fn agent(mock: Option<Arc<MockCompletion>>) -> EngagementAgent {
        EngagementAgent::new(
            mock.map(|m| m as Arc<dyn CompletionClient>),
            Arc::new(Prompts::default()),
            Arc::new(MemorySimilarityIndex::with_sample_catalog()),
            Arc::new(SimulatedAnalytics::new()),
            3,
        )
        .unwrap()
    }

    fn request(blog_id: Option<&str>) -> EngagementRequest {
        EngagementRequest {
            content: "Squats build leg strength.".to_string(),
            tags: vec!["fitness".to_string(), "strength".to_string()],
            blog_id: blog_id.map(str::to_string),
            comments: vec![],
        }
    }

    #[tokio::test]
    async fn test_analytics_only_with_blog_id() {
        let without = agent(None).analyze(&request(None)).await;
        assert!(without.payload().analytics.is_none());

        let with = agent(None).analyze(&request(Some("post-7"))).await;
        assert!(with.payload().analytics.is_some());
    }

    #[tokio::test]
    async fn test_disabled_fallback_payload() {
        let outcome = agent(None).analyze(&request(None)).await;
        assert_eq!(outcome.reason(), Some(Degradation::CompletionDisabled));

        let result = outcome.into_payload();
        assert_eq!(result.insights, GENERIC_INSIGHTS);
        assert_eq!(result.suggested_tags, vec!["fitness", "strength"]);
        assert_eq!(result.improvements, CANNED_IMPROVEMENTS);
    }

    #[tokio::test]
    async fn test_default_tags_without_input_tags() {
        let mut req = request(None);
        req.tags.clear();
        let result = agent(None).analyze(&req).await.into_payload();
        assert_eq!(result.suggested_tags, DEFAULT_TAGS);
    }

    #[tokio::test]
    async fn test_prose_becomes_insights() {
        let prose = "x".repeat(800);
        let mock = Arc::new(MockCompletion::replying(&prose));
        let outcome = agent(Some(mock)).analyze(&request(None)).await;

        assert_eq!(outcome.reason(), Some(Degradation::MalformedResponse));
        assert_eq!(
            outcome.payload().insights.chars().count(),
            MAX_INSIGHT_CHARS
        );
    }

    #[tokio::test]
    async fn test_partial_json_filled_per_field() {
        let mock = Arc::new(MockCompletion::replying(
            r#"{"insights": "Strong hook.", "suggested_tags": ["legs", "squats"]}"#,
        ));
        let outcome = agent(Some(mock)).analyze(&request(None)).await;
        assert!(outcome.is_ok());

        let result = outcome.into_payload();
        assert_eq!(result.insights, "Strong hook.");
        assert_eq!(result.suggested_tags, vec!["legs", "squats"]);
        assert_eq!(result.improvements, CANNED_IMPROVEMENTS);
    }

    #[tokio::test]
    async fn test_object_without_fields_is_malformed() {
        let mock = Arc::new(MockCompletion::replying(r#"{"score": 7}"#));
        let outcome = agent(Some(mock)).analyze(&request(None)).await;
        assert_eq!(outcome.reason(), Some(Degradation::MalformedResponse));

        let result = outcome.into_payload();
        assert_eq!(result.insights, GENERIC_INSIGHTS);
        assert_eq!(result.suggested_tags, vec!["fitness", "strength"]);
        assert_eq!(result.improvements, CANNED_IMPROVEMENTS);
    }

    #[tokio::test]
    async fn test_missing_insights_uses_generic_text() {
        let mock = Arc::new(MockCompletion::replying(r#"{"improvements": "Add a recipe."}"#));
        let outcome = agent(Some(mock)).analyze(&request(None)).await;
        assert!(outcome.is_ok());

        let result = outcome.into_payload();
        assert_eq!(result.insights, GENERIC_INSIGHTS);
        assert_eq!(result.improvements, "Add a recipe.");
    }

    #[tokio::test]
    async fn test_context_folded_into_prompt() {
        let mock = Arc::new(MockCompletion::replying("{}"));
        let mut req = request(Some("post-7"));
        req.comments = vec!["Great tips!".to_string()];
        agent(Some(mock.clone())).analyze(&req).await;

        let prompts = mock.prompts();
        // Sentiment refinement runs first, then the engagement prompt.
        assert_eq!(prompts.len(), 2);
        let prompt = &prompts[1];
        assert!(prompt.contains("Post tags: fitness, strength"));
        assert!(prompt.contains("views"));
        assert!(prompt.contains("Beginner's Guide to Strength Training"));
        assert!(prompt.contains("1 positive, 0 negative, 0 neutral"));
    }
}
