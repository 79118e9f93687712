//! Web search providers.

use super::{SearchHit, WebSearch};
use crate::error::{Result, StrideError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Health publishers whose site search backs the static results.
const STATIC_SOURCES: &[(&str, &str)] = &[
    ("Healthline", "https://www.healthline.com/search"),
    ("Mayo Clinic", "https://www.mayoclinic.org/search/search-results"),
    ("Harvard Health", "https://www.health.harvard.edu/search"),
    ("NIH News in Health", "https://newsinhealth.nih.gov/search"),
    ("ACE Fitness", "https://www.acefitness.org/search"),
];

/// Deterministic results pointing at publisher search pages. No network.
#[derive(Debug, Default, Clone)]
pub struct StaticWebSearch;

impl StaticWebSearch {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebSearch for StaticWebSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        STATIC_SOURCES
            .iter()
            .take(num_results)
            .map(|(name, base)| {
                let url = Url::parse_with_params(base, &[("q", query)])
                    .map_err(|e| StrideError::Search(e.to_string()))?;
                Ok(SearchHit {
                    title: format!("{} - {}", query, name),
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

/// Search backed by a SearxNG instance with JSON output enabled.
#[derive(Debug, Clone)]
pub struct SearxSearch {
    endpoint: Url,
    client: Client,
}

#[derive(Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

#[derive(Deserialize)]
struct SearxResult {
    #[serde(default)]
    title: String,
    url: String,
}

impl SearxSearch {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| {
                StrideError::Config(format!("Invalid search base_url {}: {}", base_url, e))
            })?;
        let endpoint = base
            .join("search")
            .map_err(|e| StrideError::Config(e.to_string()))?;

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl WebSearch for SearxSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        let res = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query), ("format", "json")])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(StrideError::Search(format!(
                "Search endpoint returned {}",
                res.status()
            )));
        }

        let body: SearxResponse = res.json().await?;
        debug!("Search returned {} results", body.results.len());

        Ok(body
            .results
            .into_iter()
            .take(num_results)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_search_is_deterministic() {
        let search = StaticWebSearch::new();
        let hits = search.search("protein timing", 3).await.unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "protein timing - Healthline");
        assert_eq!(
            hits[0].url,
            "https://www.healthline.com/search?q=protein+timing"
        );
        assert_eq!(hits, search.search("protein timing", 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_static_search_caps_at_source_count() {
        let hits = StaticWebSearch::new().search("sleep", 50).await.unwrap();
        assert_eq!(hits.len(), STATIC_SOURCES.len());
    }

    #[test]
    fn test_searx_endpoint() {
        let search = SearxSearch::new("http://localhost:8888/").unwrap();
        assert_eq!(search.endpoint.as_str(), "http://localhost:8888/search");
        assert!(SearxSearch::new("not a url").is_err());
    }
}
