//! Doctor command - verify configuration and providers.

use crate::cli::Output;
use crate::config::{prompts, Prompts, SearchProvider, Settings};
use console::style;
use std::path::Path;
use std::time::Duration;

/// Templates every agent needs.
const REQUIRED_TEMPLATES: &[&str] = &[
    prompts::CONTENT_PLAN,
    prompts::BLOG_PLANNER,
    prompts::BLOG_WRITER,
    prompts::READABILITY,
    prompts::TONE,
    prompts::TOPIC_SUGGESTION,
    prompts::ENGAGEMENT,
    prompts::SECTION_IDEAS,
    prompts::SUMMARIZER,
    prompts::SENTIMENT,
];

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Stride Doctor");
    println!();
    println!("Checking configuration and providers...\n");

    let mut checks = Vec::new();

    println!("{}", style("Completion").bold());
    let key_check = check_api_key(&settings.llm.api_key_env, settings.api_key().as_deref());
    key_check.print();
    checks.push(key_check);
    Output::kv("Model", &settings.llm.model);

    println!();

    println!("{}", style("Prompt Templates").bold());
    let prompt_check = check_prompts(settings);
    prompt_check.print();
    checks.push(prompt_check);

    println!();

    println!("{}", style("Web Search").bold());
    let search_check = check_search(settings).await;
    search_check.print();
    checks.push(search_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Stride.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Stride is ready to use.");
    }

    Ok(())
}

/// A missing key is a warning: the pipeline still runs on fallbacks.
fn check_api_key(env_name: &str, key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.chars().count() > 12 => {
            let chars: Vec<char> = key.chars().collect();
            let masked = format!(
                "{}...{}",
                chars[..7].iter().collect::<String>(),
                chars[chars.len() - 4..].iter().collect::<String>()
            );
            CheckResult::ok(env_name, &format!("configured ({})", masked))
        }
        Some(_) => CheckResult::warning(
            env_name,
            "set but looks too short",
            "Check that the full API key was exported",
        ),
        None => CheckResult::warning(
            env_name,
            "not set; all content will come from fallbacks",
            &format!("Set with: export {}='sk-...'", env_name),
        ),
    }
}

fn check_prompts(settings: &Settings) -> CheckResult {
    let prompts = match Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    ) {
        Ok(p) => p,
        Err(e) => {
            return CheckResult::error(
                "Templates",
                &e.to_string(),
                "Fix or remove prompts.custom_dir in the config file",
            )
        }
    };

    let missing: Vec<&str> = REQUIRED_TEMPLATES
        .iter()
        .copied()
        .filter(|name| prompts.template(name).is_err())
        .collect();

    if !missing.is_empty() {
        return CheckResult::error(
            "Templates",
            &format!("missing: {}", missing.join(", ")),
            "Custom directories may only override built-in templates",
        );
    }

    let source = settings
        .prompts
        .custom_dir
        .as_deref()
        .map(|dir| format!("built-in + {}", Settings::expand_path(dir).display()))
        .unwrap_or_else(|| "built-in".to_string());
    CheckResult::ok(
        "Templates",
        &format!("{} templates ({})", prompts.names().len(), source),
    )
}

async fn check_search(settings: &Settings) -> CheckResult {
    match settings.search.provider {
        SearchProvider::Static => CheckResult::ok("Provider", "static (no network)"),
        SearchProvider::Searx => {
            let client = match reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
            {
                Ok(c) => c,
                Err(e) => return CheckResult::error("Provider", &e.to_string(), "Check TLS setup"),
            };
            match client.get(&settings.search.base_url).send().await {
                Ok(res) if res.status().is_success() => CheckResult::ok(
                    "Provider",
                    &format!("searx at {} is reachable", settings.search.base_url),
                ),
                Ok(res) => CheckResult::warning(
                    "Provider",
                    &format!("searx answered {}", res.status()),
                    "Topic suggestions log search failures and continue",
                ),
                Err(e) => CheckResult::warning(
                    "Provider",
                    &format!("searx unreachable: {}", e),
                    "Start the instance or set search.provider = \"static\"",
                ),
            }
        }
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: stride config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_masking() {
        let result = check_api_key("OPENAI_API_KEY", Some("sk-proj-abcdefghijklmnop"));
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.message, "configured (sk-proj...mnop)");

        assert_eq!(
            check_api_key("KEY", Some("short")).status,
            CheckStatus::Warning
        );
        assert_eq!(check_api_key("KEY", None).status, CheckStatus::Warning);
    }

    #[test]
    fn test_builtin_templates_pass() {
        let result = check_prompts(&Settings::default());
        assert_eq!(result.status, CheckStatus::Ok);
    }

    #[test]
    fn test_bad_custom_dir_is_error() {
        let mut settings = Settings::default();
        settings.prompts.custom_dir = Some("/definitely/not/here".to_string());
        assert_eq!(check_prompts(&settings).status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_static_search_is_ok() {
        assert_eq!(
            check_search(&Settings::default()).await.status,
            CheckStatus::Ok
        );
    }
}
