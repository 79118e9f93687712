//! Stride - blog content orchestration for a health and fitness app
//!
//! Plans, drafts and refines blog posts by calling a language model, and
//! degrades to deterministic output whenever the model or a data provider is
//! unavailable.
//!
//! # Overview
//!
//! Stride lets you:
//! - Turn a topic into a structured outline and a writing plan
//! - Draft a full post from that outline
//! - Improve readability, adjust tone and summarize existing posts
//! - Suggest new topics, analyse engagement and classify reader comments
//!
//! Every operation returns an [`agents::Outcome`]: the model's result, or a
//! usable fallback together with the reason it was used.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings and prompt templates
//! - `completion` - Completion capability (OpenAI, mock)
//! - `parse` - Tolerant JSON extraction from model output
//! - `tools` - Outline planning, sentiment, search, similarity and analytics
//! - `agents` - One agent per content operation
//! - `graphs` - Agents composed into aggregated results
//! - `orchestrator` - Builds everything once and exposes the operations
//!
//! # Example
//!
//! ```rust,no_run
//! use stride::config::Settings;
//! use stride::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let outcome = orchestrator.generate_content("Zone 2 cardio").await;
//!     if let Some(reason) = outcome.reason() {
//!         eprintln!("fallback draft ({})", reason);
//!     }
//!     println!("{}", outcome.payload().content);
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod graphs;
pub mod openai;
pub mod orchestrator;
pub mod parse;
pub mod tools;

pub use error::{Result, StrideError};
