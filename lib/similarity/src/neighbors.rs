//! Rater neighbourhoods for an item

use cinematch_core::{Catalog, ItemId, UserId};
use serde::Serialize;

use crate::pearson::pearson_correlation;

/// A rater of the query item and how closely they track it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f64,
}

/// Up to `k` raters of `item_id`, most similar first
///
/// Each rater's full rating vector (keyed by item id) is correlated against
/// the item's rater vector (keyed by user id). The two key spaces differ and
/// are intersected as raw integers.
///
/// Raters are visited in ascending user id and the sort is stable, so equal
/// similarities keep that order. Unknown items yield an empty list.
pub fn neighbors_of(catalog: &Catalog, item_id: ItemId, k: usize) -> Vec<Neighbor> {
    if !catalog.contains(item_id) {
        return Vec::new();
    }
    let Some(item_raters) = catalog.raters_of(item_id) else {
        return Vec::new();
    };

    let mut neighbors: Vec<Neighbor> = item_raters
        .keys()
        .filter_map(|&user_id| {
            let rater = catalog.rater(user_id)?;
            Some(Neighbor {
                user_id,
                similarity: pearson_correlation(&rater.ratings, item_raters),
            })
        })
        .collect();

    neighbors.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    neighbors.truncate(k);
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Users 1..=6 rate items 1..=6 and the target item 7. Users 1..=5 rate
    /// item k the way user k rates item 7; user 6 does the opposite.
    fn catalog_with_outlier() -> Catalog {
        let mut catalog = Catalog::new();
        for id in 1..=7 {
            catalog.insert_item(id, format!("Movie {}", id), vec![]).unwrap();
        }
        let target_by_user = [5.0, 4.0, 3.0, 2.0, 1.0, 3.0];
        for user in 1..=6i64 {
            catalog.record_rating(user, 7, target_by_user[user as usize - 1]).unwrap();
            for item in 1..=6i64 {
                let aligned = target_by_user[item as usize - 1];
                let rating = if user == 6 { 6.0 - aligned } else { aligned };
                catalog.record_rating(user, item, rating).unwrap();
            }
        }
        catalog
    }

    #[test]
    fn test_outlier_ranks_last_with_negative_similarity() {
        let catalog = catalog_with_outlier();
        let neighbors = neighbors_of(&catalog, 7, 20);
        assert_eq!(neighbors.len(), 6);

        let last = neighbors.last().unwrap();
        assert_eq!(last.user_id, 6);
        assert!(last.similarity < 0.0);
        for n in &neighbors[..5] {
            assert!(n.similarity > 0.99, "user {} got {}", n.user_id, n.similarity);
        }
    }

    #[test]
    fn test_ties_keep_user_order() {
        let catalog = catalog_with_outlier();
        let ids: Vec<UserId> = neighbors_of(&catalog, 7, 20).iter().map(|n| n.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_truncates_to_k() {
        let catalog = catalog_with_outlier();
        assert_eq!(neighbors_of(&catalog, 7, 2).len(), 2);
        assert!(neighbors_of(&catalog, 7, 0).is_empty());
    }

    #[test]
    fn test_unknown_or_unrated_item() {
        let catalog = catalog_with_outlier();
        assert!(neighbors_of(&catalog, 99, 20).is_empty());

        let mut catalog = Catalog::new();
        catalog.insert_item(1, "Lonely", vec![]).unwrap();
        assert!(neighbors_of(&catalog, 1, 20).is_empty());
    }
}
