//! Comment sentiment classification.
//!
//! A keyword vote always runs first. When a completion client is available
//! the model refines it, and each field it returns overrides the keyword
//! value for that field only.

use crate::agents::{Degradation, Outcome, PromptAgent};
use crate::completion::Completion;
use crate::config::prompts::SENTIMENT;
use crate::config::Prompts;
use crate::error::Result;
use crate::parse::{parse_json_object, str_field, string_list_field};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Comments sent to the model per call.
const MAX_AI_COMMENTS: usize = 20;
const MAX_KEY_THEMES: usize = 5;

const POSITIVE_KEYWORDS: &[&str] = &[
    "great", "love", "awesome", "excellent", "helpful", "amazing", "thank", "good", "useful",
    "inspiring", "fantastic", "best", "motivat",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "poor", "useless", "boring", "worst", "confusing",
    "wrong", "disappoint", "misleading",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" | "mixed" => Ok(Sentiment::Neutral),
            _ => Err(format!("Unknown sentiment: {}", s)),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SentimentResult {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub overall_sentiment: Sentiment,
    pub key_themes: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SentimentResult {
    /// One-line description for prompts.
    pub fn describe(&self) -> String {
        format!(
            "{} positive, {} negative, {} neutral (overall {})",
            self.positive, self.negative, self.neutral, self.overall_sentiment
        )
    }
}

/// Keyword vote over all comments.
///
/// A comment matching keywords from both lists counts as neutral, so the
/// three counts always add up to the number of comments.
pub fn keyword_baseline(comments: &[String]) -> SentimentResult {
    let mut positive = 0;
    let mut negative = 0;
    let mut theme_counts: HashMap<&'static str, usize> = HashMap::new();

    for comment in comments {
        let lower = comment.to_lowercase();
        let pos: Vec<&'static str> = matched_keywords(&lower, POSITIVE_KEYWORDS);
        let neg: Vec<&'static str> = matched_keywords(&lower, NEGATIVE_KEYWORDS);

        match (pos.is_empty(), neg.is_empty()) {
            (false, true) => positive += 1,
            (true, false) => negative += 1,
            _ => {}
        }

        for keyword in pos.into_iter().chain(neg) {
            *theme_counts.entry(keyword).or_default() += 1;
        }
    }

    let neutral = comments.len() - positive - negative;
    let overall_sentiment = overall(positive, negative);

    SentimentResult {
        positive,
        negative,
        neutral,
        overall_sentiment,
        key_themes: top_themes(theme_counts),
        recommendations: vec![baseline_recommendation(overall_sentiment).to_string()],
    }
}

fn matched_keywords(lower: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect()
}

fn overall(positive: usize, negative: usize) -> Sentiment {
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Most frequent first; ties keep keyword-list order.
fn top_themes(counts: HashMap<&'static str, usize>) -> Vec<String> {
    let order = |k: &str| {
        POSITIVE_KEYWORDS
            .iter()
            .chain(NEGATIVE_KEYWORDS)
            .position(|p| *p == k)
            .unwrap_or(usize::MAX)
    };
    let mut themes: Vec<(&str, usize)> = counts.into_iter().collect();
    themes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| order(a.0).cmp(&order(b.0))));
    themes
        .into_iter()
        .take(MAX_KEY_THEMES)
        .map(|(k, _)| k.to_string())
        .collect()
}

fn baseline_recommendation(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => {
            "Readers are responding well; keep publishing in this style and invite them to share the post."
        }
        Sentiment::Negative => {
            "Address the concerns raised in the comments and revise any unclear or contested sections."
        }
        Sentiment::Neutral => {
            "Encourage more discussion with a question or call to action at the end of the post."
        }
    }
}

/// Classifies reader comments.
pub struct SentimentTool {
    agent: PromptAgent,
}

impl SentimentTool {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            agent: PromptAgent::new("sentiment", completion, prompts, SENTIMENT)?,
        })
    }

    /// Sentiment counts, themes and recommendations for `comments`.
    pub async fn classify(&self, comments: &[String]) -> SentimentResult {
        self.analyze(comments).await.into_payload()
    }

    /// Like [`SentimentTool::classify`], reporting whether the model refined the result.
    #[instrument(skip(self, comments), fields(count = comments.len()))]
    pub async fn analyze(&self, comments: &[String]) -> Outcome<SentimentResult> {
        if comments.is_empty() {
            return Outcome::Ok(SentimentResult::default());
        }

        let baseline = keyword_baseline(comments);
        debug!("Keyword baseline: {}", baseline.describe());

        let numbered = comments
            .iter()
            .take(MAX_AI_COMMENTS)
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        let Some(response) = self
            .agent
            .run_with(&[("comments", numbered), ("baseline", baseline.describe())])
            .await
        else {
            return Outcome::degraded(baseline, self.agent.missing_reason());
        };

        let Some(map) = parse_json_object(&response) else {
            warn!(
                component = "sentiment",
                "Sentiment response was not JSON; keeping baseline"
            );
            return Outcome::degraded(baseline, Degradation::MalformedResponse);
        };

        let count = |key: &str, base: usize| {
            map.get(key)
                .and_then(serde_json::Value::as_u64)
                .map(|n| n as usize)
                .unwrap_or(base)
        };

        Outcome::Ok(SentimentResult {
            positive: count("positive", baseline.positive),
            negative: count("negative", baseline.negative),
            neutral: count("neutral", baseline.neutral),
            overall_sentiment: str_field(&map, "overall_sentiment")
                .and_then(|s| s.parse().ok())
                .unwrap_or(baseline.overall_sentiment),
            key_themes: string_list_field(&map, "key_themes").unwrap_or(baseline.key_themes),
            recommendations: string_list_field(&map, "recommendations")
                .unwrap_or(baseline.recommendations),
        })
    }
}
