//! Topics, engagement and suggestion command implementations.

use crate::agents::{
    EngagementRequest, EngagementResult, TopicList, TopicRequest, TopicSuggestion,
};
use crate::cli::{read_text, Output};
use crate::config::Settings;
use crate::graphs::SuggestionRequest;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the topics command.
pub async fn run_topics(
    category: Option<String>,
    count: Option<usize>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let request = TopicRequest {
        category,
        count,
        user_id: None,
    };

    let spinner = Output::spinner("Finding topics...");
    let outcome = orchestrator.suggest_topics(&request).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome.map(|topics| TopicList { topics }));
    }

    Output::outcome_status(&outcome);
    Output::header(&format!("Topics: {}", request.category()));
    print_topics(outcome.payload());
    Ok(())
}

/// Run the engagement command.
pub async fn run_engagement(
    input: &str,
    tags: Vec<String>,
    blog_id: Option<String>,
    comments: Vec<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let request = EngagementRequest {
        content: read_text(input)?,
        tags,
        blog_id,
        comments,
    };
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Analysing engagement...");
    let outcome = orchestrator.analyze_engagement(&request).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    print_engagement(outcome.payload());
    Ok(())
}

/// Run the suggest command.
pub async fn run_suggest(
    content: Option<String>,
    tags: Vec<String>,
    category: Option<String>,
    count: Option<usize>,
    user_id: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let content = content.as_deref().map(read_text).transpose()?;
    let has_content = content.is_some();
    let request = SuggestionRequest {
        content,
        tags,
        user_id,
        category,
        count,
    };
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Gathering suggestions...");
    let outcome = orchestrator.aggregate_suggestions(&request).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    let aggregate = outcome.payload();

    if has_content {
        print_engagement(&EngagementResult {
            insights: aggregate.insights.clone(),
            suggested_tags: aggregate.suggested_tags.clone(),
            improvements: aggregate.improvements.clone(),
            analytics: aggregate.analytics.clone(),
        });

        Output::header("New Section Ideas");
        if aggregate.new_section_ideas.is_empty() {
            Output::info("No section ideas available.");
        }
        for idea in &aggregate.new_section_ideas {
            Output::list_item(idea);
        }
    }

    Output::header("Suggested Topics");
    print_topics(&aggregate.suggested_topics);
    Ok(())
}

fn print_topics(topics: &[TopicSuggestion]) {
    for topic in topics {
        Output::topic(&topic.title, &topic.reason, topic.trending);
    }
}

fn print_engagement(result: &EngagementResult) {
    Output::header("Insights");
    println!("{}", result.insights);

    Output::header("Improvements");
    println!("{}", result.improvements);

    Output::header("Suggested Tags");
    println!("{}", result.suggested_tags.join(", "));

    if let Some(stats) = &result.analytics {
        Output::header("Analytics");
        Output::kv("Views", &stats.views.to_string());
        Output::kv("Likes", &stats.likes.to_string());
        Output::kv("Comments", &stats.comments.to_string());
        Output::kv("Shares", &stats.shares.to_string());
        Output::kv(
            "Avg. read time",
            &format!("{:.0}s", stats.average_read_time),
        );
    }
}
