//! Scripted completion client for tests and offline runs.

use super::CompletionClient;
use crate::error::{Result, StrideError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion client that replays canned replies and records every prompt.
///
/// Replies are consumed in order; once only one is left it is repeated.
/// A client built with [`MockCompletion::failing`] errors on every call.
pub struct MockCompletion {
    replies: Mutex<VecDeque<String>>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    /// Always answer with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self::scripted([reply])
    }

    /// Answer with each reply in turn, repeating the last one.
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            failure: Some(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(message) = &self.failure {
            return Err(StrideError::Completion(message.clone()));
        }

        let mut replies = self
            .replies
            .lock()
            .map_err(|e| StrideError::Completion(e.to_string()))?;

        match replies.len() {
            0 => Err(StrideError::Completion("No scripted reply".to_string())),
            1 => Ok(replies[0].clone()),
            _ => Ok(replies.pop_front().unwrap_or_default()),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_repeat_last() {
        let mock = MockCompletion::scripted(["one", "two"]);
        assert_eq!(mock.complete("a").await.unwrap(), "one");
        assert_eq!(mock.complete("b").await.unwrap(), "two");
        assert_eq!(mock.complete("c").await.unwrap(), "two");
        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_records_prompt() {
        let mock = MockCompletion::failing("provider down");
        assert!(mock.complete("hello").await.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
