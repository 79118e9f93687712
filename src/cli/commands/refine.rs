//! Readability and tone command implementations.

use crate::cli::{read_text, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the readability command.
pub async fn run_readability(
    input: &str,
    title: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let content = read_text(input)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Improving readability...");
    let outcome = orchestrator
        .improve_readability(&content, title.as_deref())
        .await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    println!("{}", outcome.payload().improved_content);
    Ok(())
}

/// Run the tone command.
pub async fn run_tone(
    input: &str,
    tone: &str,
    title: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let content = read_text(input)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Adjusting tone to {}...", tone));
    let outcome = orchestrator
        .adjust_tone(&content, tone, title.as_deref())
        .await;
    spinner.finish_and_clear();

    if json {
        return Output::json(&outcome);
    }

    Output::outcome_status(&outcome);
    println!("{}", outcome.payload().adjusted_content);
    Ok(())
}
