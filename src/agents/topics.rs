//! Topic suggestions.
//!
//! Web search results are fetched for the category but only logged; they are
//! not part of the prompt.

use super::{Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::TOPIC_SUGGESTION;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{parse_json_array, parse_json_object, str_field};
use crate::tools::WebSearch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_COUNT: usize = 5;
pub const MAX_COUNT: usize = 20;

const NUTRITION_TOPICS: &[(&str, &str, bool)] = &[
    (
        "Protein Needs for Active Adults",
        "Readers often ask how much protein they need to support training and recovery.",
        true,
    ),
    (
        "Meal Prep Basics for Busy Weeks",
        "Planning meals ahead is one of the easiest ways to eat well consistently.",
        true,
    ),
    (
        "Understanding Macronutrients",
        "A clear explanation of carbs, fats and protein helps readers make better choices.",
        false,
    ),
    (
        "Hydration Beyond Eight Glasses",
        "Fluid needs vary with activity and climate, and the old rule of thumb confuses people.",
        false,
    ),
    (
        "Smart Snacking for Steady Energy",
        "Snacks are where many diets go off track; practical swaps are always in demand.",
        false,
    ),
];

const FITNESS_TOPICS: &[(&str, &str, bool)] = &[
    (
        "Strength Training for Beginners",
        "New lifters want a safe, simple way to start building strength.",
        true,
    ),
    (
        "The Benefits of Zone 2 Cardio",
        "Low-intensity cardio is trending for its endurance and longevity benefits.",
        true,
    ),
    (
        "Mobility Routines You Can Do at Home",
        "Short mobility sessions fit any schedule and help prevent injury.",
        false,
    ),
    (
        "How to Structure a Weekly Workout Plan",
        "Readers want to balance strength, cardio and rest without overthinking it.",
        false,
    ),
    (
        "Recovery Days: Why Rest Builds Fitness",
        "Many people undertrain recovery; explaining it improves results and adherence.",
        false,
    ),
];

const WELLNESS_TOPICS: &[(&str, &str, bool)] = &[
    (
        "Sleep Habits That Support Your Health",
        "Better sleep improves energy, mood and training results.",
        true,
    ),
    (
        "Managing Stress with Simple Daily Practices",
        "Readers look for realistic ways to lower stress without big lifestyle changes.",
        true,
    ),
    (
        "Building a Mindful Morning Routine",
        "Morning routines are popular and easy to adapt to any schedule.",
        false,
    ),
    (
        "Digital Detox: Reclaiming Your Attention",
        "Screen time is a common concern and small changes make a visible difference.",
        false,
    ),
    (
        "The Link Between Movement and Mental Health",
        "Connecting exercise with mood gives readers another reason to stay active.",
        false,
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    pub title: String,
    pub reason: String,
    pub trending: bool,
    pub category: String,
}

/// Topic list wrapped in an object, for serializing inside an [`Outcome`] envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicList {
    pub topics: Vec<TopicSuggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TopicRequest {
    pub fn category(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT).min(MAX_COUNT)
    }
}

/// The first `count` entries of the static table for `category`.
///
/// Categories without a table use the nutrition table. Never returns more
/// entries than the table holds.
pub fn fallback_topics(category: &str, count: usize) -> Vec<TopicSuggestion> {
    let (name, table) = match category.trim().to_lowercase().as_str() {
        "fitness" => ("fitness", FITNESS_TOPICS),
        "wellness" => ("wellness", WELLNESS_TOPICS),
        _ => ("nutrition", NUTRITION_TOPICS),
    };

    table
        .iter()
        .take(count)
        .map(|(title, reason, trending)| TopicSuggestion {
            title: title.to_string(),
            reason: reason.to_string(),
            trending: *trending,
            category: name.to_string(),
        })
        .collect()
}

pub struct TopicSuggestionAgent {
    agent: PromptAgent,
    search: Arc<dyn WebSearch>,
    search_results: usize,
}

impl TopicSuggestionAgent {
    pub fn new(
        completion: Completion,
        prompts: Arc<Prompts>,
        search: Arc<dyn WebSearch>,
        search_results: usize,
    ) -> Result<Self> {
        Ok(Self {
            agent: PromptAgent::new("topic_suggestion", completion, prompts, TOPIC_SUGGESTION)?,
            search,
            search_results,
        })
    }

    #[instrument(skip(self))]
    pub async fn suggest(&self, request: &TopicRequest) -> Outcome<Vec<TopicSuggestion>> {
        let category = request.category();
        let count = request.count();
        let fallback = || fallback_topics(category, count);

        let query = format!("trending {} health topics", category);
        match self.search.search(&query, self.search_results).await {
            Ok(hits) => debug!(
                hits = hits.len(),
                titles = ?hits.iter().map(|h| h.title.as_str()).collect::<Vec<_>>(),
                "Fetched search context"
            ),
            Err(e) => warn!(component = "topic_suggestion", error = %e, "Web search failed"),
        }

        let Some(response) = self
            .agent
            .run_with(&[("category", category.to_string()), ("count", count.to_string())])
            .await
        else {
            return Outcome::degraded(fallback(), self.agent.missing_reason());
        };

        let topics = parse_topics(&response, category);
        if topics.is_empty() {
            warn!(
                component = "topic_suggestion",
                "No topics in response; using fallback table"
            );
            return Outcome::degraded(fallback(), Degradation::MalformedResponse);
        }

        Outcome::Ok(fit_to_count(topics, category, count))
    }
}

/// Topics from a bare array or an object with a `topics` array.
fn parse_topics(response: &str, category: &str) -> Vec<TopicSuggestion> {
    let items = parse_json_array(response).or_else(|| {
        parse_json_object(response)
            .and_then(|mut map| map.remove("topics"))
            .and_then(|v| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
    });

    items
        .unwrap_or_default()
        .iter()
        .filter_map(|item| match item {
            Value::String(title) if !title.trim().is_empty() => Some(TopicSuggestion {
                title: title.trim().to_string(),
                reason: String::new(),
                trending: false,
                category: category.to_string(),
            }),
            Value::Object(map) => Some(TopicSuggestion {
                title: str_field(map, "title")?,
                reason: str_field(map, "reason").unwrap_or_default(),
                trending: matches!(map.get("trending"), Some(Value::Bool(true))),
                category: str_field(map, "category").unwrap_or_else(|| category.to_string()),
            }),
            _ => None,
        })
        .collect()
}

/// Truncate to `count`, padding from the fallback table with titles not already present.
fn fit_to_count(
    mut topics: Vec<TopicSuggestion>,
    category: &str,
    count: usize,
) -> Vec<TopicSuggestion> {
    topics.truncate(count);
    if topics.len() < count {
        let mut seen: HashSet<String> = topics.iter().map(|t| t.title.to_lowercase()).collect();
        let missing = count - topics.len();
        let padding: Vec<TopicSuggestion> = fallback_topics(category, MAX_COUNT)
            .into_iter()
            .filter(|t| seen.insert(t.title.to_lowercase()))
            .take(missing)
            .collect();
        topics.extend(padding);
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};
    use crate::error::StrideError;
    use crate::tools::{SearchHit, StaticWebSearch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records each search; fails every call when `failing` is set.
    #[derive(Default)]
    struct RecordingSearch {
        calls: Mutex<Vec<(String, usize)>>,
        failing: bool,
    }

    #[async_trait]
    impl WebSearch for RecordingSearch {
        async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), num_results));
            if self.failing {
                return Err(StrideError::Search("connection refused".to_string()));
            }
            Ok(vec![SearchHit {
                title: "Creatine myths busted".to_string(),
                url: "https://example.org/creatine".to_string(),
            }])
        }
    }

    fn agent_with_search(
        completion: Option<Arc<MockCompletion>>,
        search: Arc<RecordingSearch>,
    ) -> TopicSuggestionAgent {
        TopicSuggestionAgent::new(
            completion.map(|m| m as Arc<dyn CompletionClient>),
            Arc::new(Prompts::default()),
            search,
            3,
        )
        .unwrap()
    }

    fn agent(reply: Option<&str>) -> TopicSuggestionAgent {
        let completion =
            reply.map(|r| Arc::new(MockCompletion::replying(r)) as Arc<dyn CompletionClient>);
        TopicSuggestionAgent::new(
            completion,
            Arc::new(Prompts::default()),
            Arc::new(StaticWebSearch::new()),
            3,
        )
        .unwrap()
    }

    fn request(category: &str, count: usize) -> TopicRequest {
        TopicRequest {
            category: Some(category.to_string()),
            count: Some(count),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_fitness_fallback_in_table_order() {
        let outcome = agent(None).suggest(&request("fitness", 3)).await;
        assert_eq!(outcome.reason(), Some(Degradation::CompletionDisabled));

        let topics = outcome.into_payload();
        assert_eq!(topics.len(), 3);
        assert!(topics.iter().all(|t| t.category == "fitness"));
        let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
        let table: Vec<&str> = FITNESS_TOPICS.iter().take(3).map(|t| t.0).collect();
        assert_eq!(titles, table);
    }

    #[test]
    fn test_fallback_tables() {
        assert_eq!(fallback_topics("Wellness", 1)[0].category, "wellness");
        assert_eq!(fallback_topics("general", 2)[0].category, "nutrition");
        assert_eq!(fallback_topics("fitness", 50).len(), FITNESS_TOPICS.len());
        assert!(fallback_topics("fitness", 0).is_empty());
    }

    #[test]
    fn test_topic_list_envelope() {
        let outcome = Outcome::degraded(fallback_topics("fitness", 1), Degradation::NoResponse)
            .map(|topics| TopicList { topics });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["topics"][0]["category"], "fitness");
        assert_eq!(json["success"], false);
        assert_eq!(json["reason"], "no_response");
    }

    #[test]
    fn test_request_defaults() {
        let request = TopicRequest::default();
        assert_eq!(request.category(), "general");
        assert_eq!(request.count(), 5);
        assert_eq!(
            TopicRequest {
                count: Some(500),
                ..Default::default()
            }
            .count(),
            MAX_COUNT
        );
    }

    #[tokio::test]
    async fn test_model_topics_truncated() {
        let reply = r#"[
            {"title": "A", "reason": "r", "trending": true, "category": "fitness"},
            {"title": "B"},
            {"title": "C"}
        ]"#;
        let topics = agent(Some(reply))
            .suggest(&request("fitness", 2))
            .await
            .into_payload();
        assert_eq!(topics.len(), 2);
        assert!(topics[0].trending);
        assert_eq!(topics[1].category, "fitness");
        assert_eq!(topics[1].reason, "");
    }

    #[tokio::test]
    async fn test_model_topics_padded_from_table() {
        let reply =
            r#"{"topics": [{"title": "Strength Training for Beginners"}, "Kettlebell Basics"]}"#;
        let outcome = agent(Some(reply)).suggest(&request("fitness", 4)).await;
        assert!(outcome.is_ok());

        let titles: Vec<String> = outcome
            .into_payload()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Strength Training for Beginners",
                "Kettlebell Basics",
                "The Benefits of Zone 2 Cardio",
                "Mobility Routines You Can Do at Home",
            ]
        );
    }

    #[tokio::test]
    async fn test_unusable_reply_falls_back() {
        let outcome = agent(Some("Sure! Here are some ideas..."))
            .suggest(&request("wellness", 2))
            .await;
        assert_eq!(outcome.reason(), Some(Degradation::MalformedResponse));
        assert_eq!(outcome.into_payload(), fallback_topics("wellness", 2));
    }

    #[tokio::test]
    async fn test_one_search_kept_out_of_prompt() {
        let search = Arc::new(RecordingSearch::default());
        let mock = Arc::new(MockCompletion::replying(r#"["Sleep and Recovery"]"#));
        let outcome = agent_with_search(Some(mock.clone()), search.clone())
            .suggest(&request("fitness", 1))
            .await;
        assert!(outcome.is_ok());

        let calls = search.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 3);
        assert!(calls[0].0.contains("fitness"));

        let prompts = mock.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].contains("Creatine myths busted"));
        assert!(!prompts[0].contains("example.org"));
    }

    #[tokio::test]
    async fn test_failed_search_still_suggests() {
        let search = Arc::new(RecordingSearch {
            failing: true,
            ..Default::default()
        });

        let mock = Arc::new(MockCompletion::replying(r#"["Sleep and Recovery"]"#));
        let outcome = agent_with_search(Some(mock), search.clone())
            .suggest(&request("fitness", 1))
            .await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.payload()[0].title, "Sleep and Recovery");

        let offline = agent_with_search(None, search.clone())
            .suggest(&request("nutrition", 2))
            .await;
        assert_eq!(offline.reason(), Some(Degradation::CompletionDisabled));
        assert_eq!(offline.into_payload(), fallback_topics("nutrition", 2));
        assert_eq!(search.calls.lock().unwrap().len(), 2);
    }
}
