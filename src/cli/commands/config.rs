//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(
    action: &ConfigAction,
    config_path: Option<PathBuf>,
    settings: Settings,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                Output::warning(&format!(
                    "Config already exists at {}",
                    config_path.display()
                ));
                Output::info("Use --force to overwrite it with defaults.");
                return Ok(());
            }

            Settings::default().save_to(&config_path)?;
            Output::success(&format!("Wrote default config to {}", config_path.display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_and_respects_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let init = |force| {
            run_config(
                &ConfigAction::Init { force },
                Some(path.clone()),
                Settings::default(),
            )
        };

        init(false).unwrap();
        assert!(path.exists());

        std::fs::write(&path, "[llm]\nmodel = \"custom\"\n").unwrap();
        init(false).unwrap();
        let kept = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(kept.llm.model, "custom");

        init(true).unwrap();
        let reset = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reset.llm.model, Settings::default().llm.model);
    }
}
