//! Stride CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use stride::cli::{commands, Cli, Commands};
use stride::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("stride={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command {
        Commands::Plan {
            topic,
            outline_only,
            json,
        } => {
            commands::run_plan(&topic, outline_only, json, settings).await?;
        }

        Commands::Write {
            topic,
            output,
            json,
        } => {
            commands::run_write(&topic, output, json, settings).await?;
        }

        Commands::Readability { input, title, json } => {
            commands::run_readability(&input, title, json, settings).await?;
        }

        Commands::Tone {
            input,
            tone,
            title,
            json,
        } => {
            commands::run_tone(&input, &tone, title, json, settings).await?;
        }

        Commands::Topics {
            category,
            count,
            json,
        } => {
            commands::run_topics(category, count, json, settings).await?;
        }

        Commands::Engagement {
            input,
            tags,
            blog_id,
            comments,
            json,
        } => {
            commands::run_engagement(&input, tags, blog_id, comments, json, settings).await?;
        }

        Commands::Suggest {
            content,
            tags,
            category,
            count,
            user_id,
            json,
        } => {
            commands::run_suggest(content, tags, category, count, user_id, json, settings).await?;
        }

        Commands::Summarize { input, title, json } => {
            commands::run_summarize(&input, &title, json, settings).await?;
        }

        Commands::Sentiment {
            comments,
            file,
            json,
        } => {
            commands::run_sentiment(comments, file, json, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Doctor => {
            let path = config_path.unwrap_or_else(Settings::default_config_path);
            commands::run_doctor(&settings, &path).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, config_path, settings)?;
        }
    }

    Ok(())
}
