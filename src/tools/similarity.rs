//! In-memory similar-post index.
//!
//! Posts are matched by tag overlap (Jaccard) and ties broken by engagement.

use super::{SimilarPost, SimilaritySearch};
use crate::error::{Result, StrideError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

/// Published posts seeded into [`MemorySimilarityIndex::with_sample_catalog`].
const SAMPLE_CATALOG: &[(&str, f32, &[&str])] = &[
    (
        "10 High-Protein Breakfasts for Busy Mornings",
        0.82,
        &["nutrition", "protein", "breakfast", "meal-prep"],
    ),
    (
        "Beginner's Guide to Strength Training",
        0.91,
        &["fitness", "strength", "beginner", "workout"],
    ),
    (
        "How Sleep Affects Muscle Recovery",
        0.76,
        &["sleep", "recovery", "wellness", "fitness"],
    ),
    (
        "HIIT vs. Steady-State Cardio",
        0.68,
        &["fitness", "cardio", "hiit", "workout"],
    ),
    (
        "Mindful Eating: A Practical Introduction",
        0.59,
        &["nutrition", "mindfulness", "wellness", "habits"],
    ),
    (
        "Stretching Routines for Desk Workers",
        0.64,
        &["mobility", "stretching", "wellness", "workout"],
    ),
    (
        "Hydration Myths, Debunked",
        0.71,
        &["nutrition", "hydration", "health"],
    ),
    (
        "Building a Sustainable Running Habit",
        0.73,
        &["running", "cardio", "habits", "fitness"],
    ),
];

/// In-memory similarity index.
pub struct MemorySimilarityIndex {
    posts: RwLock<Vec<SimilarPost>>,
}

impl MemorySimilarityIndex {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Index pre-loaded with a small catalog of health and fitness posts.
    pub fn with_sample_catalog() -> Self {
        let posts = SAMPLE_CATALOG
            .iter()
            .map(|(title, engagement, tags)| SimilarPost {
                title: title.to_string(),
                engagement: *engagement,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })
            .collect();

        Self {
            posts: RwLock::new(posts),
        }
    }

    pub fn insert(&self, post: SimilarPost) -> Result<()> {
        let mut posts = self
            .posts
            .write()
            .map_err(|e| StrideError::Similarity(e.to_string()))?;
        posts.push(post);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.posts.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySimilarityIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn normalized(tags: &[String]) -> HashSet<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

#[async_trait]
impl SimilaritySearch for MemorySimilarityIndex {
    async fn query(&self, tags: &[String], top_k: usize) -> Result<Vec<SimilarPost>> {
        let posts = self
            .posts
            .read()
            .map_err(|e| StrideError::Similarity(e.to_string()))?;
        let wanted = normalized(tags);

        let mut scored: Vec<(f32, &SimilarPost)> = posts
            .iter()
            .map(|post| (jaccard(&wanted, &normalized(&post.tags)), post))
            .filter(|(score, _)| wanted.is_empty() || *score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.1.engagement
                        .partial_cmp(&a.1.engagement)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        scored.truncate(top_k);

        Ok(scored.into_iter().map(|(_, post)| post.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_query_by_tag_overlap() {
        let index = MemorySimilarityIndex::with_sample_catalog();
        let results = index
            .query(&tags(&["Fitness", "workout"]), 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Beginner's Guide to Strength Training");
        assert!(results
            .iter()
            .all(|p| p.tags.iter().any(|t| t == "fitness" || t == "workout")));
    }

    #[tokio::test]
    async fn test_no_overlap_returns_nothing() {
        let index = MemorySimilarityIndex::with_sample_catalog();
        let results = index.query(&tags(&["astronomy"]), 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_tags_rank_by_engagement() {
        let index = MemorySimilarityIndex::with_sample_catalog();
        let results = index.query(&[], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].engagement, 0.91);
        assert_eq!(results[1].engagement, 0.82);
    }

    #[tokio::test]
    async fn test_insert() {
        let index = MemorySimilarityIndex::new();
        assert!(index.is_empty());

        index
            .insert(SimilarPost {
                title: "Yoga for Runners".to_string(),
                engagement: 0.5,
                tags: tags(&["yoga", "running"]),
            })
            .unwrap();

        let results = index.query(&tags(&["yoga"]), 3).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(index.len(), 1);
    }
}
