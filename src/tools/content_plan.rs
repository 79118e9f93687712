//! Structured outline ("mindmap") generation for a blog topic.
//!
//! Three tiers: the model's outline as-is, the model's outline with missing
//! fields filled from the topic-derived fallback, or the fallback alone.

use crate::agents::{Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::CONTENT_PLAN;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{parse_json_object, str_field};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Topic used when the caller passes a blank one.
pub const DEFAULT_TOPIC: &str = "Health and Fitness";

/// The outline a post is written from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mindmap {
    pub title: String,
    pub description: String,
    pub sections: Vec<Section>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub title: String,
}

impl Section {
    fn new<S: Into<String>>(
        title: impl Into<String>,
        subsections: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            title: title.into(),
            subsections: subsections
                .into_iter()
                .map(|s| Subsection { title: s.into() })
                .collect(),
        }
    }
}

impl Mindmap {
    /// Deterministic outline derived from the topic alone.
    pub fn fallback(topic: &str) -> Self {
        let topic = normalize_topic(topic);

        Self {
            title: format!("The Complete Guide to {}", topic),
            description: format!(
                "Everything you need to know about {}: what it is, why it matters for your health, and how to get started safely.",
                topic
            ),
            sections: vec![
                Section::new(
                    format!("Introduction to {}", topic),
                    [format!("What is {}?", topic), format!("Why {} matters", topic)],
                ),
                Section::new(
                    "Key Benefits",
                    ["Physical health benefits", "Mental and emotional benefits"],
                ),
                Section::new(
                    "Getting Started",
                    ["First steps for beginners", "Common mistakes to avoid"],
                ),
                Section::new(
                    "Tips for Long-Term Success",
                    ["Building a sustainable routine", "Tracking your progress"],
                ),
                Section::new("Conclusion", ["Key takeaways"]),
            ],
            tags: dedup_tags(vec![
                topic.to_lowercase(),
                "health".to_string(),
                "fitness".to_string(),
                "wellness".to_string(),
            ]),
        }
    }

    /// Sections as an indented list, for prompts.
    pub fn sections_outline(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, section.title));
            for subsection in &section.subsections {
                out.push_str(&format!("   - {}\n", subsection.title));
            }
        }
        out.trim_end().to_string()
    }

    /// Markdown skeleton: title, description, then one heading per section and subsection.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n{}\n", self.title, self.description);
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n", section.title));
            for subsection in &section.subsections {
                out.push_str(&format!("\n### {}\n", subsection.title));
            }
        }
        out
    }

    /// Build from a model response object, filling missing fields from `fallback`.
    ///
    /// Returns the mindmap and the names of the fields that were filled in.
    fn from_model(map: &Map<String, Value>, fallback: Mindmap) -> (Self, Vec<&'static str>) {
        let mut repaired = Vec::new();

        let title = str_field(map, "title").unwrap_or_else(|| {
            repaired.push("title");
            fallback.title
        });
        let description = str_field(map, "description").unwrap_or_else(|| {
            repaired.push("description");
            fallback.description
        });
        let sections = map.get("sections").and_then(parse_sections).unwrap_or_else(|| {
            repaired.push("sections");
            fallback.sections
        });
        let tags = match map.get("tags").and_then(Value::as_array) {
            Some(items) => dedup_tags(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|t| t.trim().to_string())
                    .collect(),
            ),
            None => {
                repaired.push("tags");
                fallback.tags
            }
        };

        (
            Self {
                title,
                description,
                sections,
                tags,
            },
            repaired,
        )
    }
}

pub(crate) fn normalize_topic(topic: &str) -> &str {
    let topic = topic.trim();
    if topic.is_empty() {
        DEFAULT_TOPIC
    } else {
        topic
    }
}

/// Accepts sections as objects or bare strings, and subsections likewise.
/// A section without subsections gets an overview subsection. `None` when no
/// usable section remains.
fn parse_sections(value: &Value) -> Option<Vec<Section>> {
    let title_of = |v: &Value| -> Option<String> {
        let title = match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(obj) => str_field(obj, "title"),
            _ => None,
        };
        title.filter(|s| !s.is_empty())
    };

    let sections: Vec<Section> = value
        .as_array()?
        .iter()
        .filter_map(|item| {
            let title = title_of(item)?;
            let mut subsections: Vec<Subsection> = item
                .get("subsections")
                .and_then(Value::as_array)
                .map(|subs| {
                    subs.iter()
                        .filter_map(|s| title_of(s).map(|title| Subsection { title }))
                        .collect()
                })
                .unwrap_or_default();
            if subsections.is_empty() {
                subsections.push(Subsection {
                    title: format!("Overview of {}", title),
                });
            }
            Some(Section { title, subsections })
        })
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

/// Which tier produced an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Model,
    Repaired,
    Fallback,
}

impl std::fmt::Display for PlanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanSource::Model => write!(f, "model"),
            PlanSource::Repaired => write!(f, "repaired"),
            PlanSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Produces a [`Mindmap`] for a topic.
pub struct ContentPlanTool {
    agent: PromptAgent,
}

impl ContentPlanTool {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            agent: PromptAgent::new("content_plan", completion, prompts, CONTENT_PLAN)?,
        })
    }

    /// Outline for `topic`, always well-formed.
    pub async fn generate_outline(&self, topic: &str) -> Mindmap {
        self.plan(topic).await.into_payload()
    }

    /// Outline for `topic`, with whether the model produced it.
    pub async fn plan(&self, topic: &str) -> Outcome<Mindmap> {
        self.plan_traced(topic).await.0
    }

    /// Like [`ContentPlanTool::plan`], also reporting which tier produced the outline.
    #[instrument(skip(self))]
    pub async fn plan_traced(&self, topic: &str) -> (Outcome<Mindmap>, PlanSource) {
        let topic = normalize_topic(topic);
        let fallback = Mindmap::fallback(topic);

        let Some(response) = self.agent.run_with(&[("topic", topic.to_string())]).await else {
            return (
                Outcome::degraded(fallback, self.agent.missing_reason()),
                PlanSource::Fallback,
            );
        };

        let Some(map) = parse_json_object(&response) else {
            warn!(
                component = "content_plan",
                "Outline response was not JSON; using fallback"
            );
            return (
                Outcome::degraded(fallback, Degradation::MalformedResponse),
                PlanSource::Fallback,
            );
        };

        let (mindmap, repaired) = Mindmap::from_model(&map, fallback);
        if repaired.is_empty() {
            return (Outcome::Ok(mindmap), PlanSource::Model);
        }

        debug!(component = "content_plan", ?repaired, "Filled missing outline fields");
        (Outcome::Ok(mindmap), PlanSource::Repaired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};

    fn tool(reply: Option<&str>) -> ContentPlanTool {
        let completion =
            reply.map(|r| Arc::new(MockCompletion::replying(r)) as Arc<dyn CompletionClient>);
        ContentPlanTool::new(completion, Arc::new(Prompts::default())).unwrap()
    }

    fn assert_well_formed(mindmap: &Mindmap) {
        assert!(!mindmap.title.is_empty());
        assert!(!mindmap.description.is_empty());
        assert!(!mindmap.sections.is_empty());
        assert!(mindmap.sections.iter().all(|s| !s.subsections.is_empty()));
    }

    #[tokio::test]
    async fn test_fallback_for_any_topic() {
        let tool = tool(None);
        for topic in ["Strength training", "", "   ", "\n\t"] {
            let mindmap = tool.generate_outline(topic).await;
            assert_well_formed(&mindmap);
        }
        let blank = tool.generate_outline("  ").await;
        assert_eq!(blank.title, "The Complete Guide to Health and Fitness");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = tokio_test::block_on(tool(None).generate_outline("Hydration"));
        let b = tokio_test::block_on(tool(None).generate_outline("Hydration"));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.tags, vec!["hydration", "health", "fitness", "wellness"]);
    }

    #[tokio::test]
    async fn test_fallback_tags_dedup() {
        let mindmap = tool(None).generate_outline("Fitness").await;
        assert_eq!(mindmap.tags, vec!["fitness", "health", "wellness"]);
    }

    #[tokio::test]
    async fn test_full_model_outline() {
        let reply = r#"```json
{"title": "Sleep Better", "description": "Rest matters.",
 "sections": [{"title": "Why Sleep", "subsections": [{"title": "Recovery"}]}],
 "tags": ["sleep", "recovery"]}
```"#;
        let outcome = tool(Some(reply)).plan("sleep").await;
        assert!(outcome.is_ok());

        let mindmap = outcome.into_payload();
        assert_eq!(mindmap.title, "Sleep Better");
        assert_eq!(mindmap.sections.len(), 1);
        assert_eq!(mindmap.sections[0].subsections[0].title, "Recovery");
        assert_eq!(mindmap.tags, vec!["sleep", "recovery"]);
    }

    #[tokio::test]
    async fn test_partial_outline_is_repaired() {
        let reply = r#"{"title": "Model Title", "sections": [{"title": "Only Section"}]}"#;
        let mindmap = tool(Some(reply)).generate_outline("Yoga").await;
        let fallback = Mindmap::fallback("Yoga");

        assert_eq!(mindmap.title, "Model Title");
        assert_eq!(mindmap.description, fallback.description);
        assert_eq!(mindmap.tags, fallback.tags);
        assert_eq!(mindmap.sections.len(), 1);
        assert_eq!(
            mindmap.sections[0].subsections[0].title,
            "Overview of Only Section"
        );
    }

    #[tokio::test]
    async fn test_plan_source() {
        let full = r#"{"title": "T", "description": "D", "sections": ["S"], "tags": ["t"]}"#;
        assert_eq!(
            tool(Some(full)).plan_traced("Rowing").await.1,
            PlanSource::Model
        );

        let partial = r#"{"title": "T"}"#;
        assert_eq!(
            tool(Some(partial)).plan_traced("Rowing").await.1,
            PlanSource::Repaired
        );

        let (outcome, source) = tool(None).plan_traced("Rowing").await;
        assert_eq!(source, PlanSource::Fallback);
        assert_eq!(outcome.reason(), Some(Degradation::CompletionDisabled));
    }

    #[tokio::test]
    async fn test_empty_sections_use_fallback() {
        let reply = r#"{"title": "T", "description": "D", "sections": [], "tags": []}"#;
        let mindmap = tool(Some(reply)).generate_outline("Running").await;
        assert_eq!(mindmap.sections, Mindmap::fallback("Running").sections);
        assert!(mindmap.tags.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let outcome = tool(Some("I'd love to help with that!"))
            .plan("Cycling")
            .await;
        assert_eq!(outcome.reason(), Some(Degradation::MalformedResponse));
        assert_eq!(outcome.into_payload(), Mindmap::fallback("Cycling"));
    }

    #[tokio::test]
    async fn test_string_sections_are_accepted() {
        let reply =
            r#"{"sections": ["Warm-up", {"title": "Main set", "subsections": ["Intervals"]}]}"#;
        let mindmap = tool(Some(reply)).generate_outline("Swimming").await;
        assert_eq!(mindmap.sections[0].title, "Warm-up");
        assert_eq!(mindmap.sections[1].subsections[0].title, "Intervals");
    }

    #[test]
    fn test_markdown_and_outline_rendering() {
        let mindmap = Mindmap::fallback("Mobility");
        let markdown = mindmap.to_markdown();
        assert!(markdown.starts_with("# The Complete Guide to Mobility\n"));
        assert!(markdown.contains("\n## Key Benefits\n"));
        assert!(markdown.contains("\n### Key takeaways\n"));

        let outline = mindmap.sections_outline();
        assert!(outline.starts_with("1. Introduction to Mobility\n   - What is Mobility?"));
    }
}
