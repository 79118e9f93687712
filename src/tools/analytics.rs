//! Simulated analytics store.

use super::{AnalyticsStore, BlogAnalytics};
use crate::error::{Result, StrideError};
use async_trait::async_trait;
use tracing::debug;

/// Derives stable, plausible numbers from the blog id. Same id, same numbers.
#[derive(Debug, Default, Clone)]
pub struct SimulatedAnalytics;

impl SimulatedAnalytics {
    pub fn new() -> Self {
        Self
    }
}

/// FNV-1a; stable across builds and platforms.
fn fingerprint(id: &str) -> u64 {
    id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[async_trait]
impl AnalyticsStore for SimulatedAnalytics {
    async fn get(&self, blog_id: &str) -> Result<BlogAnalytics> {
        let blog_id = blog_id.trim();
        if blog_id.is_empty() {
            return Err(StrideError::Analytics("Blog id is empty".to_string()));
        }

        let seed = fingerprint(blog_id);
        let views = 500 + seed % 9_500;
        let likes = views * (2 + (seed >> 16) % 8) / 100;
        let comments = likes * (5 + (seed >> 24) % 15) / 100;
        let shares = likes * (10 + (seed >> 32) % 20) / 100;
        let average_read_time = 60.0 + ((seed >> 40) % 240) as f64;

        debug!(blog_id, views, "Simulated analytics");

        Ok(BlogAnalytics {
            views,
            likes,
            comments,
            shares,
            average_read_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic() {
        let store = SimulatedAnalytics::new();
        let a = store.get("post-42").await.unwrap();
        let b = store.get("post-42").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_plausible_ranges() {
        let store = SimulatedAnalytics::new();
        for id in ["a", "post-1", "2024/protein-guide"] {
            let stats = store.get(id).await.unwrap();
            assert!((500..10_000).contains(&stats.views));
            assert!(stats.likes <= stats.views);
            assert!(stats.comments <= stats.likes);
            assert!(stats.shares <= stats.likes);
            assert!((60.0..300.0).contains(&stats.average_read_time));
        }
    }

    #[tokio::test]
    async fn test_empty_id() {
        let result = SimulatedAnalytics::new().get("  ").await;
        assert!(matches!(result, Err(StrideError::Analytics(_))));
    }
}
