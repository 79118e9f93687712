//! Tools used by the agents: outline planning, sentiment, and the external
//! data accessors (web search, similar posts, analytics).

pub mod analytics;
pub mod content_plan;
pub mod search;
pub mod sentiment;
pub mod similarity;

pub use analytics::SimulatedAnalytics;
pub use content_plan::{ContentPlanTool, Mindmap, PlanSource, Section, Subsection};
pub use search::{SearxSearch, StaticWebSearch};
pub use sentiment::{Sentiment, SentimentResult, SentimentTool};
pub use similarity::MemorySimilarityIndex;

use crate::completion::{self, Completion};
use crate::config::{SearchProvider, Settings};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// A previously published post returned by similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPost {
    pub title: String,
    /// Engagement rate in `[0, 1]`.
    pub engagement: f32,
    pub tags: Vec<String>,
}

/// Performance numbers for one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogAnalytics {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Seconds.
    pub average_read_time: f64,
}

/// Trait for web search providers.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>>;
}

/// Trait for similar-post lookup.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn query(&self, tags: &[String], top_k: usize) -> Result<Vec<SimilarPost>>;
}

/// Trait for post analytics lookup.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn get(&self, blog_id: &str) -> Result<BlogAnalytics>;
}

/// Every external capability the pipeline uses, built once and shared.
#[derive(Clone)]
pub struct Capabilities {
    pub completion: Completion,
    pub search: Arc<dyn WebSearch>,
    pub similarity: Arc<dyn SimilaritySearch>,
    pub analytics: Arc<dyn AnalyticsStore>,
    /// Results requested per web search.
    pub search_results: usize,
    /// Similar posts requested per engagement analysis.
    pub similar_top_k: usize,
}

impl Capabilities {
    /// Build capabilities from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let search: Arc<dyn WebSearch> = match settings.search.provider {
            SearchProvider::Static => Arc::new(StaticWebSearch::new()),
            SearchProvider::Searx => Arc::new(SearxSearch::new(&settings.search.base_url)?),
        };

        Ok(Self {
            completion: completion::initialize(settings),
            search,
            similarity: Arc::new(MemorySimilarityIndex::with_sample_catalog()),
            analytics: Arc::new(SimulatedAnalytics::new()),
            search_results: settings.search.num_results,
            similar_top_k: settings.similarity.top_k,
        })
    }

    /// Offline capabilities around an optional completion client.
    pub fn offline(completion: Completion) -> Self {
        Self {
            completion,
            search: Arc::new(StaticWebSearch::new()),
            similarity: Arc::new(MemorySimilarityIndex::with_sample_catalog()),
            analytics: Arc::new(SimulatedAnalytics::new()),
            search_results: 3,
            similar_top_k: 3,
        }
    }

    pub fn completion_enabled(&self) -> bool {
        self.completion.is_some()
    }
}
