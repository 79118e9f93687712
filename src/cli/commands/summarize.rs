//! Summarize and sentiment command implementations.

use crate::cli::{read_lines, read_text, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(input: &str, title: &str, json: bool, settings: Settings) -> Result<()> {
    let content = read_text(input)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Summarizing...");
    let outcome = orchestrator.summarize(title, &content).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    let summary = outcome.payload();
    if summary.summary.is_empty() {
        Output::warning("No summary available.");
    } else {
        println!("{}", summary.summary);
    }
    if !summary.keywords.is_empty() {
        Output::kv("Keywords", &summary.keywords.join(", "));
    }
    Ok(())
}

/// Run the sentiment command.
pub async fn run_sentiment(
    mut comments: Vec<String>,
    file: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    if let Some(source) = file {
        comments.extend(read_lines(&source)?);
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Classifying {} comment(s)...", comments.len()));
    let outcome = orchestrator.classify_comments(&comments).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    let result = outcome.payload();
    Output::header(&format!("Overall: {}", result.overall_sentiment));
    Output::kv("Positive", &result.positive.to_string());
    Output::kv("Negative", &result.negative.to_string());
    Output::kv("Neutral", &result.neutral.to_string());

    if !result.key_themes.is_empty() {
        Output::header("Key Themes");
        for theme in &result.key_themes {
            Output::list_item(theme);
        }
    }
    if !result.recommendations.is_empty() {
        Output::header("Recommendations");
        for recommendation in &result.recommendations {
            Output::list_item(recommendation);
        }
    }
    Ok(())
}
