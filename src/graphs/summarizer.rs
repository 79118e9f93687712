use crate::agents::{Outcome, SummarizerAgent, SummaryResult};
use crate::completion::Completion;
use crate::config::Prompts;
use crate::error::Result;
use std::sync::Arc;

/// Single-step graph around [`SummarizerAgent`].
pub struct SummarizerGraph {
    agent: SummarizerAgent,
}

impl SummarizerGraph {
    pub fn new(completion: Completion, prompts: Arc<Prompts>) -> Result<Self> {
        Ok(Self {
            agent: SummarizerAgent::new(completion, prompts)?,
        })
    }

    pub async fn run(&self, title: &str, content: &str) -> Outcome<SummaryResult> {
        self.agent.summarize(title, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, MockCompletion};

    #[tokio::test]
    async fn test_delegates_to_agent() {
        let client: Arc<dyn CompletionClient> =
            Arc::new(MockCompletion::replying(r#"{"summary": "s", "keywords": ["k"]}"#));
        let graph = SummarizerGraph::new(Some(client), Arc::new(Prompts::default())).unwrap();

        let result = graph.run("Title", "Body").await.into_payload();
        assert_eq!(result.summary, "s");
        assert_eq!(result.keywords, vec!["k"]);
    }
}
