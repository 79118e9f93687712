//! CLI command implementations.

mod config;
mod doctor;
mod plan;
mod refine;
mod serve;
mod suggest;
mod summarize;

pub use config::run_config;
pub use doctor::run_doctor;
pub use plan::{run_plan, run_write};
pub use refine::{run_readability, run_tone};
pub use serve::run_serve;
pub use suggest::{run_engagement, run_suggest, run_topics};
pub use summarize::{run_sentiment, run_summarize};
