//! Graphs compose several agents into one aggregated result.

mod suggestion;
mod summarizer;

pub use suggestion::{SuggestionAggregate, SuggestionGraph, SuggestionRequest};
pub use summarizer::SummarizerGraph;
