use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::item::{ItemId, Rater, Rating, UserId};

/// Sparse ratings indexed in both directions
///
/// Every recorded `(user, item, rating)` fact lands in the user's rating
/// vector and in the item's rater vector within the same call. The inner
/// vectors are ordered maps, so iteration over raters or rated items is
/// always ascending by id.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    // user_id -> rater (item_id -> rating)
    by_user: AHashMap<UserId, Rater>,
    // item_id -> (user_id -> rating)
    by_item: AHashMap<ItemId, BTreeMap<UserId, Rating>>,
}

impl RatingStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating, overwriting any earlier rating for the same pair.
    /// Returns the previous rating, if there was one.
    pub fn record(&mut self, user_id: UserId, item_id: ItemId, rating: Rating) -> Option<Rating> {
        let previous = self
            .by_user
            .entry(user_id)
            .or_insert_with(|| Rater::new(user_id))
            .ratings
            .insert(item_id, rating);
        self.by_item.entry(item_id).or_default().insert(user_id, rating);
        previous
    }

    /// All ratings given by a user, keyed by item id
    pub fn ratings_of(&self, user_id: UserId) -> Option<&BTreeMap<ItemId, Rating>> {
        self.by_user.get(&user_id).map(|rater| &rater.ratings)
    }

    /// All ratings received by an item, keyed by user id
    pub fn raters_of(&self, item_id: ItemId) -> Option<&BTreeMap<UserId, Rating>> {
        self.by_item.get(&item_id)
    }

    pub fn rater(&self, user_id: UserId) -> Option<&Rater> {
        self.by_user.get(&user_id)
    }

    pub fn rating(&self, user_id: UserId, item_id: ItemId) -> Option<Rating> {
        self.ratings_of(user_id)?.get(&item_id).copied()
    }

    pub fn raters(&self) -> impl Iterator<Item = &Rater> {
        self.by_user.values()
    }

    #[inline]
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    /// Number of entries on the user side
    pub fn rating_count(&self) -> usize {
        self.by_user.values().map(|rater| rater.ratings.len()).sum()
    }

    /// Number of entries on the item side
    pub fn item_rating_count(&self) -> usize {
        self.by_item.values().map(BTreeMap::len).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_both_directions() {
        let mut store = RatingStore::new();
        store.record(1, 100, 4.0);
        store.record(2, 100, 3.0);
        store.record(1, 200, 5.0);

        assert_eq!(store.user_count(), 2);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.ratings_of(1).unwrap().len(), 2);
        assert_eq!(store.raters_of(100).unwrap().len(), 2);
        assert_eq!(store.rating(2, 100), Some(3.0));
        assert_eq!(store.rating_count(), store.item_rating_count());
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = RatingStore::new();
        assert_eq!(store.record(1, 10, 2.0), None);
        assert_eq!(store.record(1, 10, 4.5), Some(2.0));
        assert_eq!(store.rating(1, 10), Some(4.5));
        assert_eq!(store.raters_of(10).unwrap().get(&1), Some(&4.5));
        assert_eq!(store.rating_count(), 1);
    }

    #[test]
    fn test_raters_iterate_in_user_order() {
        let mut store = RatingStore::new();
        for user in [9, 3, 7, 1] {
            store.record(user, 5, 3.0);
        }
        let users: Vec<UserId> = store.raters_of(5).unwrap().keys().copied().collect();
        assert_eq!(users, vec![1, 3, 7, 9]);
    }

    #[test]
    fn test_unknown_lookups() {
        let store = RatingStore::new();
        assert!(store.is_empty());
        assert!(store.ratings_of(1).is_none());
        assert!(store.raters_of(1).is_none());
        assert!(store.rater(1).is_none());
        assert_eq!(store.rating(1, 1), None);
    }
}
