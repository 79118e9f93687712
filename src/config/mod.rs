//! Configuration module for Stride.
//!
//! Handles loading and managing application settings and prompt templates.

pub mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    GeneralSettings, LlmSettings, PromptSettings, SearchProvider, SearchSettings,
    ServerSettings, Settings, SimilaritySettings,
};
