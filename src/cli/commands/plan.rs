//! Plan and write command implementations.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};

/// Run the plan command.
pub async fn run_plan(
    topic: &str,
    outline_only: bool,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    if outline_only {
        let spinner = Output::spinner("Building outline...");
        let (outcome, source) = orchestrator.outline(topic).await;
        spinner.finish_and_clear();

        if json {
            return Output::json(&serde_json::json!({
                "source": source,
                "mindmap": outcome,
            }));
        }

        Output::outcome_status(&outcome);
        Output::kv("Source", &source.to_string());
        println!("\n{}", outcome.payload().to_markdown());
        return Ok(());
    }

    let spinner = Output::spinner("Planning post...");
    let outcome = orchestrator.plan_outline(topic).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    let plan = outcome.payload();
    Output::header(&plan.mindmap.title);
    println!("{}\n", plan.mindmap.description);
    Output::kv("Tags", &plan.mindmap.tags.join(", "));
    println!("\n{}", plan.outline);

    Ok(())
}

/// Run the write command.
pub async fn run_write(
    topic: &str,
    output: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Writing draft...");
    let outcome = orchestrator.generate_content(topic).await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    let draft = outcome.payload();

    match output {
        Some(path) => {
            std::fs::write(&path, &draft.content)
                .with_context(|| format!("Failed to write {}", path))?;
            Output::success(&format!("Wrote \"{}\" to {}", draft.title, path));
        }
        None => println!("{}", draft.content),
    }

    Ok(())
}
