//! Pipeline orchestrator for Stride.
//!
//! Builds the capability set and every agent once, then exposes the content
//! operations to the CLI and the HTTP adapter.

use crate::agents::{
    BlogDraft, BlogPlan, BlogPlannerAgent, BlogWriterAgent, EngagementAgent, EngagementRequest,
    EngagementResult, Outcome, ReadabilityAgent, ReadabilityResult, SummaryResult, ToneAgent,
    ToneResult, TopicRequest, TopicSuggestion, TopicSuggestionAgent,
};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::graphs::{SuggestionAggregate, SuggestionGraph, SuggestionRequest, SummarizerGraph};
use crate::tools::{
    Capabilities, ContentPlanTool, Mindmap, PlanSource, SentimentResult, SentimentTool,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Stride pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Arc<Prompts>,
    capabilities: Capabilities,
    content_plan: ContentPlanTool,
    planner: BlogPlannerAgent,
    writer: BlogWriterAgent,
    readability: ReadabilityAgent,
    tone: ToneAgent,
    topics: TopicSuggestionAgent,
    engagement: EngagementAgent,
    sentiment: SentimentTool,
    suggestions: SuggestionGraph,
    summarizer: SummarizerGraph,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    ///
    /// Fails only on configuration defects: a bad prompt directory, a missing
    /// template, or an invalid search endpoint. A missing API key is not an
    /// error; the pipeline then runs on fallbacks.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let capabilities = Capabilities::from_settings(&settings)?;

        Self::with_capabilities(settings, prompts, capabilities)
    }

    /// Create an orchestrator with custom capabilities.
    pub fn with_capabilities(
        settings: Settings,
        prompts: Prompts,
        capabilities: Capabilities,
    ) -> Result<Self> {
        let prompts = Arc::new(prompts);
        let completion = capabilities.completion.clone();

        let orchestrator = Self {
            content_plan: ContentPlanTool::new(completion.clone(), prompts.clone())?,
            planner: BlogPlannerAgent::new(completion.clone(), prompts.clone())?,
            writer: BlogWriterAgent::new(completion.clone(), prompts.clone())?,
            readability: ReadabilityAgent::new(completion.clone(), prompts.clone())?,
            tone: ToneAgent::new(completion.clone(), prompts.clone())?,
            topics: TopicSuggestionAgent::new(
                completion.clone(),
                prompts.clone(),
                capabilities.search.clone(),
                capabilities.search_results,
            )?,
            engagement: EngagementAgent::new(
                completion.clone(),
                prompts.clone(),
                capabilities.similarity.clone(),
                capabilities.analytics.clone(),
                capabilities.similar_top_k,
            )?,
            sentiment: SentimentTool::new(completion.clone(), prompts.clone())?,
            suggestions: SuggestionGraph::new(&capabilities, prompts.clone())?,
            summarizer: SummarizerGraph::new(completion, prompts.clone())?,
            settings,
            prompts,
            capabilities,
        };

        info!(
            completion = orchestrator.completion_enabled(),
            "Orchestrator ready"
        );
        Ok(orchestrator)
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    pub fn completion_enabled(&self) -> bool {
        self.capabilities.completion_enabled()
    }

    /// Model name when completion is enabled.
    pub fn model(&self) -> Option<&str> {
        self.capabilities.completion.as_ref().map(|c| c.model())
    }

    /// Bare outline for a topic, with the tier that produced it.
    pub async fn outline(&self, topic: &str) -> (Outcome<Mindmap>, PlanSource) {
        self.content_plan.plan_traced(topic).await
    }

    #[instrument(skip(self))]
    pub async fn plan_outline(&self, topic: &str) -> Outcome<BlogPlan> {
        self.planner.plan(topic).await
    }

    #[instrument(skip(self))]
    pub async fn generate_content(&self, topic: &str) -> Outcome<BlogDraft> {
        self.writer.generate(topic).await
    }

    pub async fn improve_readability(
        &self,
        content: &str,
        title: Option<&str>,
    ) -> Outcome<ReadabilityResult> {
        self.readability.improve(content, title).await
    }

    pub async fn adjust_tone(
        &self,
        content: &str,
        target_tone: &str,
        title: Option<&str>,
    ) -> Outcome<ToneResult> {
        self.tone.adjust(content, target_tone, title).await
    }

    pub async fn suggest_topics(&self, request: &TopicRequest) -> Outcome<Vec<TopicSuggestion>> {
        self.topics.suggest(request).await
    }

    pub async fn analyze_engagement(
        &self,
        request: &EngagementRequest,
    ) -> Outcome<EngagementResult> {
        self.engagement.analyze(request).await
    }

    pub async fn aggregate_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Outcome<SuggestionAggregate> {
        self.suggestions.aggregate(request).await
    }

    pub async fn summarize(&self, title: &str, content: &str) -> Outcome<SummaryResult> {
        self.summarizer.run(title, content).await
    }

    pub async fn classify_comments(&self, comments: &[String]) -> Outcome<SentimentResult> {
        self.sentiment.analyze(comments).await
    }
}
