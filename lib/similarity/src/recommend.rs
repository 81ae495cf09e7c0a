//! Recommendation pipeline
//!
//! Two independent strategies over a frozen [`Catalog`]:
//!
//! - **collaborative**: the item's most similar raters vote for the other
//!   items they liked, weighted by their similarity
//! - **content**: every other item is scored by genre overlap with the target
//!
//! Both finish with the same bounded top-k selection, so ties resolve to the
//! lower item id.

use ahash::AHashMap;
use cinematch_core::{Catalog, Item, ItemId, RecommendConfig, TopK};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::neighbors::{neighbors_of, Neighbor};
use crate::overlap::item_overlap;

/// A recommended item with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: Item,
    pub score: f64,
}

/// Timings for a batch of collaborative queries
#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchmarkReport {
    pub queries: usize,
    pub total: Duration,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
}

/// Running `(Σ sim·rating, Σ sim)` for one candidate
#[derive(Debug, Clone, Copy, Default)]
struct Vote {
    weighted: f64,
    similarity: f64,
}

/// Query front end borrowing a catalog for its whole lifetime
pub struct Recommender<'a> {
    catalog: &'a Catalog,
    config: RecommendConfig,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a Catalog, config: RecommendConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// The neighbourhood collaborative scoring draws from
    pub fn neighbors(&self, item_id: ItemId) -> Vec<Neighbor> {
        neighbors_of(self.catalog, item_id, self.config.neighbor_count)
    }

    /// Items liked by raters who rate like the target's audience, best first
    pub fn collaborative(&self, item_id: ItemId, n: usize) -> Vec<Recommendation> {
        let neighbors = self.neighbors(item_id);
        let like_threshold = self.config.like_threshold;

        let mut votes: AHashMap<ItemId, Vote> = AHashMap::new();
        let mut positive = 0usize;
        for neighbor in neighbors.iter().filter(|n| n.similarity > 0.0) {
            positive += 1;
            let Some(ratings) = self.catalog.ratings_of(neighbor.user_id) else {
                continue;
            };
            for (&candidate, &rating) in ratings {
                if candidate == item_id || rating < like_threshold {
                    continue;
                }
                let vote = votes.entry(candidate).or_default();
                vote.weighted += neighbor.similarity * f64::from(rating);
                vote.similarity += neighbor.similarity;
            }
        }

        // ids without a catalog entry (orphans, removed items) never take a slot
        let mut top = TopK::new(n);
        for (&candidate, vote) in &votes {
            if vote.similarity > 0.0 && self.catalog.contains(candidate) {
                top.push(candidate, vote.weighted / vote.similarity);
            }
        }

        debug!(
            item_id,
            neighbors = neighbors.len(),
            positive,
            candidates = votes.len(),
            "collaborative scoring done"
        );

        self.materialize(top)
    }

    /// Items sharing the most genres with the target, best first
    pub fn content(&self, item_id: ItemId, n: usize) -> Vec<Recommendation> {
        let Some(target) = self.catalog.item(item_id) else {
            return Vec::new();
        };

        let mut top = TopK::new(n);
        for item in self.catalog.items().filter(|item| item.id != item_id) {
            top.push(item.id, item_overlap(target, item));
        }

        debug!(item_id, scanned = self.catalog.len(), "content scoring done");

        self.materialize(top)
    }

    /// Time one collaborative query per id
    pub fn benchmark(&self, ids: &[ItemId], n: usize) -> BenchmarkReport {
        let mut report = BenchmarkReport {
            queries: ids.len(),
            min: Duration::MAX,
            ..Default::default()
        };

        for &id in ids {
            let start = Instant::now();
            let recommendations = self.collaborative(id, n);
            let elapsed = start.elapsed();
            debug!(id, results = recommendations.len(), ?elapsed, "benchmark query");

            report.total += elapsed;
            report.min = report.min.min(elapsed);
            report.max = report.max.max(elapsed);
        }

        if ids.is_empty() {
            report.min = Duration::ZERO;
        } else {
            report.average = report.total / ids.len() as u32;
        }
        report
    }

    // Winners whose ids no longer resolve are dropped
    fn materialize(&self, top: TopK) -> Vec<Recommendation> {
        top.into_sorted_vec()
            .into_iter()
            .filter_map(|candidate| {
                self.catalog.item(candidate.item_id).map(|item| Recommendation {
                    item: item.clone(),
                    score: candidate.score,
                })
            })
            .collect()
    }
}
