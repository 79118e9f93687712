//! Prompt templates for Stride.
//!
//! Built-in templates ship inside the binary. Any `<name>.txt` file in the
//! custom prompts directory replaces the built-in template of the same name.
//! Placeholders use `{field}`; unknown placeholders are left untouched so
//! JSON examples inside a template survive rendering.

use crate::error::{Result, StrideError};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

pub const CONTENT_PLAN: &str = "content_plan";
pub const BLOG_PLANNER: &str = "blog_planner";
pub const BLOG_WRITER: &str = "blog_writer";
pub const READABILITY: &str = "readability";
pub const TONE: &str = "tone";
pub const TOPIC_SUGGESTION: &str = "topic_suggestion";
pub const ENGAGEMENT: &str = "engagement";
pub const SECTION_IDEAS: &str = "section_ideas";
pub const SUMMARIZER: &str = "summarizer";
pub const SENTIMENT: &str = "sentiment";

const BUILTIN: &[(&str, &str)] = &[
    (CONTENT_PLAN, include_str!("../../prompts/content_plan.txt")),
    (BLOG_PLANNER, include_str!("../../prompts/blog_planner.txt")),
    (BLOG_WRITER, include_str!("../../prompts/blog_writer.txt")),
    (READABILITY, include_str!("../../prompts/readability.txt")),
    (TONE, include_str!("../../prompts/tone.txt")),
    (TOPIC_SUGGESTION, include_str!("../../prompts/topic_suggestion.txt")),
    (ENGAGEMENT, include_str!("../../prompts/engagement.txt")),
    (SECTION_IDEAS, include_str!("../../prompts/section_ideas.txt")),
    (SUMMARIZER, include_str!("../../prompts/summarizer.txt")),
    (SENTIMENT, include_str!("../../prompts/sentiment.txt")),
];

/// The template store.
#[derive(Debug, Clone)]
pub struct Prompts {
    templates: HashMap<String, String>,
    /// Custom variables from config, available in all prompts.
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            templates: BUILTIN
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
            variables: HashMap::new(),
        }
    }
}

impl Prompts {
    /// A store with no templates at all.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    /// Load prompts from the built-ins, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());
            if !custom_path.is_dir() {
                return Err(StrideError::Config(format!(
                    "Custom prompts directory does not exist: {}",
                    custom_path.display()
                )));
            }

            for entry in std::fs::read_dir(&custom_path)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                    continue;
                }
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                debug!("Loading custom prompt template {}", name);
                let content = std::fs::read_to_string(&path)?;
                prompts.templates.insert(name.to_string(), content);
            }
        }

        Ok(prompts)
    }

    /// Add or replace a template.
    pub fn with_template(mut self, name: &str, template: &str) -> Self {
        self.templates.insert(name.to_string(), template.to_string());
        self
    }

    /// Read a named template.
    pub fn template(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| StrideError::TemplateNotFound(name.to_string()))
    }

    /// Names of all known templates, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &regex::Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([a-z_][a-z0-9_]*)\}").expect("valid placeholder regex"))
}
