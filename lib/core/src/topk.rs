//! Bounded top-k selection
//!
//! Keeps the k best `(item_id, score)` pairs in a min-heap of size k, so a
//! scan over n candidates costs O(n log k). Ranking is by score descending;
//! equal scores are ordered by ascending item id, which keeps results
//! reproducible no matter what order candidates arrive in.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::item::ItemId;

/// A transient scored candidate produced while ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub item_id: ItemId,
    pub score: f64,
}

/// Heap entry: greater means better (higher score, then lower id)
#[derive(Clone, Copy, PartialEq, Eq)]
struct Ranked {
    score: OrderedFloat<f64>,
    item_id: ItemId,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.item_id.cmp(&self.item_id))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded max-k collector
#[derive(Clone)]
pub struct TopK {
    limit: usize,
    // min-heap of the best entries seen so far; the root is the weakest
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopK {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            heap: BinaryHeap::with_capacity(limit.saturating_add(1).min(1024)),
        }
    }

    pub fn push(&mut self, item_id: ItemId, score: f64) {
        if self.limit == 0 {
            return;
        }
        let entry = Reverse(Ranked {
            score: OrderedFloat(score),
            item_id,
        });
        if self.heap.len() < self.limit {
            self.heap.push(entry);
        } else if let Some(weakest) = self.heap.peek() {
            if entry < *weakest {
                self.heap.pop();
                self.heap.push(entry);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into a best-first vector
    pub fn into_sorted_vec(self) -> Vec<ScoredCandidate> {
        // ascending by Reverse<Ranked> is descending by rank
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(r)| ScoredCandidate {
                item_id: r.item_id,
                score: r.score.into_inner(),
            })
            .collect()
    }
}

impl Extend<(ItemId, f64)> for TopK {
    fn extend<I: IntoIterator<Item = (ItemId, f64)>>(&mut self, iter: I) {
        for (item_id, score) in iter {
            self.push(item_id, score);
        }
    }
}

/// Select the `k` best candidates from an iterator of `(item_id, score)`
pub fn top_k<I>(candidates: I, k: usize) -> Vec<ScoredCandidate>
where
    I: IntoIterator<Item = (ItemId, f64)>,
{
    let mut collector = TopK::new(k);
    collector.extend(candidates);
    collector.into_sorted_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(selected: &[ScoredCandidate]) -> Vec<ItemId> {
        selected.iter().map(|c| c.item_id).collect()
    }

    #[test]
    fn test_selects_highest_scores() {
        let selected = top_k(vec![(1, 0.5), (2, 3.0), (3, 1.5), (4, 2.0), (5, 0.1)], 3);
        assert_eq!(ids(&selected), vec![2, 4, 3]);
        assert_eq!(selected[0].score, 3.0);
    }

    #[test]
    fn test_ties_prefer_lower_id() {
        let forward = top_k(vec![(5, 1.0), (3, 1.0), (9, 1.0), (1, 0.0)], 2);
        let backward = top_k(vec![(1, 0.0), (9, 1.0), (3, 1.0), (5, 1.0)], 2);
        assert_eq!(ids(&forward), vec![3, 5]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_limit_larger_than_input() {
        let selected = top_k(vec![(1, 1.0), (2, 2.0)], 10);
        assert_eq!(ids(&selected), vec![2, 1]);
    }

    #[test]
    fn test_zero_limit() {
        let mut collector = TopK::new(0);
        collector.push(1, 1.0);
        assert!(collector.is_empty());
        assert!(collector.into_sorted_vec().is_empty());
    }

    #[test]
    fn test_heap_stays_bounded() {
        let mut collector = TopK::new(4);
        collector.extend((0..1000).map(|i| (i, (i % 17) as f64)));
        assert_eq!(collector.len(), 4);
        let selected = collector.into_sorted_vec();
        assert!(selected.iter().all(|c| c.score == 16.0));
        assert_eq!(ids(&selected), vec![16, 33, 50, 67]);
    }
}
