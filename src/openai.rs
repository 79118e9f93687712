//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, StrideError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    if api_key.trim().is_empty() {
        return Err(StrideError::Config("API key is empty".to_string()));
    }

    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Client::with_config(OpenAIConfig::new().with_api_key(api_key))
        .with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_timeout() -> Duration {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(matches!(
            create_client_with_timeout("  ", default_timeout()),
            Err(StrideError::Config(_))
        ));
    }

    #[test]
    fn test_client_builds_with_key() {
        assert!(create_client_with_timeout("sk-test", default_timeout()).is_ok());
    }
}
