//! HTTP API server for integration with other systems.
//!
//! One JSON route per pipeline operation. Every route answers 200 with the
//! operation's envelope, including fallback results.

use crate::agents::{EngagementRequest, TopicList, TopicRequest};
use crate::cli::Output;
use crate::config::Settings;
use crate::graphs::SuggestionRequest;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    if !orchestrator.completion_enabled() {
        Output::warning("Completion is disabled; every route will return fallback output.");
    }

    let app = router(Arc::new(AppState { orchestrator }));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");

    Output::header("Stride API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Plan", "POST /blog/plan");
    Output::kv("Generate", "POST /blog/generate");
    Output::kv("Readability", "POST /blog/readability");
    Output::kv("Tone", "POST /blog/tone");
    Output::kv("Topics", "POST /blog/topics");
    Output::kv("Engagement", "POST /blog/engagement");
    Output::kv("Suggestions", "POST /blog/suggestions");
    Output::kv("Summarize", "POST /blog/summarize");
    Output::kv("Sentiment", "POST /comments/sentiment");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/blog/plan", post(plan))
        .route("/blog/generate", post(generate))
        .route("/blog/readability", post(readability))
        .route("/blog/tone", post(tone))
        .route("/blog/topics", post(topics))
        .route("/blog/engagement", post(engagement))
        .route("/blog/suggestions", post(suggestions))
        .route("/blog/summarize", post(summarize))
        .route("/comments/sentiment", post(sentiment))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct TopicInput {
    #[serde(default)]
    topic: String,
}

#[derive(Deserialize)]
struct ReadabilityInput {
    content: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct ToneInput {
    content: String,
    #[serde(default = "default_tone")]
    target_tone: String,
    #[serde(default)]
    title: Option<String>,
}

fn default_tone() -> String {
    crate::agents::DEFAULT_TONE.to_string()
}

#[derive(Deserialize)]
struct SummarizeInput {
    #[serde(default)]
    title: String,
    content: String,
}

#[derive(Deserialize)]
struct SentimentInput {
    #[serde(default)]
    comments: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    completion_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        completion_enabled: state.orchestrator.completion_enabled(),
        model: state.orchestrator.model().map(str::to_string),
    })
}

async fn plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TopicInput>,
) -> impl IntoResponse {
    Json(state.orchestrator.plan_outline(&req.topic).await)
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TopicInput>,
) -> impl IntoResponse {
    Json(state.orchestrator.generate_content(&req.topic).await)
}

async fn readability(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReadabilityInput>,
) -> impl IntoResponse {
    Json(
        state
            .orchestrator
            .improve_readability(&req.content, req.title.as_deref())
            .await,
    )
}

async fn tone(State(state): State<Arc<AppState>>, Json(req): Json<ToneInput>) -> impl IntoResponse {
    Json(
        state
            .orchestrator
            .adjust_tone(&req.content, &req.target_tone, req.title.as_deref())
            .await,
    )
}

async fn topics(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TopicRequest>,
) -> impl IntoResponse {
    let outcome = state.orchestrator.suggest_topics(&req).await;
    Json(outcome.map(|topics| TopicList { topics }))
}

async fn engagement(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EngagementRequest>,
) -> impl IntoResponse {
    Json(state.orchestrator.analyze_engagement(&req).await)
}

async fn suggestions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestionRequest>,
) -> impl IntoResponse {
    Json(state.orchestrator.aggregate_suggestions(&req).await)
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeInput>,
) -> impl IntoResponse {
    Json(state.orchestrator.summarize(&req.title, &req.content).await)
}

async fn sentiment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SentimentInput>,
) -> impl IntoResponse {
    Json(state.orchestrator.classify_comments(&req.comments).await)
}
