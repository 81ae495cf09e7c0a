use ahash::AHashMap;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::index::{CatalogIndex, Iter};
use crate::item::{validate_rating, Item, ItemId, Rater, Rating, UserId};
use crate::ratings::RatingStore;
use crate::Result;

/// Size summary of a loaded catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub items: usize,
    pub users: usize,
    /// Entries in the item -> (user -> rating) direction
    pub item_ratings: usize,
    /// Entries in the user -> (item -> rating) direction
    pub user_ratings: usize,
    /// Rough memory held by rating entries across both directions
    pub approx_rating_bytes: usize,
}

/// Item index, rating store and title table, owned together
///
/// Built through the `&mut` methods during ingestion; every query path only
/// needs `&Catalog`, so a catalog shared with readers is frozen for as long
/// as they hold it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    index: CatalogIndex,
    ratings: RatingStore,
    titles: AHashMap<String, ItemId>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(
        &mut self,
        id: ItemId,
        title: impl Into<String>,
        genres: Vec<String>,
    ) -> Result<()> {
        let mut item = Item::new(id, title);
        item.genres = genres;
        self.insert(item)
    }

    /// Insert a fully built item and register its title
    pub fn insert(&mut self, item: Item) -> Result<()> {
        let (id, title) = (item.id, item.title.clone());
        self.index.insert(item)?;
        self.titles.insert(title, id);
        Ok(())
    }

    /// Record one rating in both directions after checking its range
    pub fn record_rating(&mut self, user_id: UserId, item_id: ItemId, rating: Rating) -> Result<()> {
        let rating = validate_rating(rating)?;
        self.ratings.record(user_id, item_id, rating);
        Ok(())
    }

    /// Remove an item from the index and the title table. Its ratings stay
    /// in the store; queries skip ids that no longer resolve.
    ///
    /// If another live item shares the title, the title moves to the highest
    /// such id instead of disappearing.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let item = self.index.remove(id)?;
        if self.titles.get(&item.title) == Some(&id) {
            let survivor = self
                .index
                .iter()
                .filter(|other| other.title == item.title)
                .map(|other| other.id)
                .last();
            match survivor {
                Some(other) => {
                    self.titles.insert(item.title.clone(), other);
                }
                None => {
                    self.titles.remove(&item.title);
                }
            }
        }
        Some(item)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.index.search(id)
    }

    #[inline]
    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains(id)
    }

    /// Items in ascending id order
    pub fn items(&self) -> Iter<'_> {
        self.index.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn raters_of(&self, item_id: ItemId) -> Option<&BTreeMap<UserId, Rating>> {
        self.ratings.raters_of(item_id)
    }

    pub fn ratings_of(&self, user_id: UserId) -> Option<&BTreeMap<ItemId, Rating>> {
        self.ratings.ratings_of(user_id)
    }

    pub fn rater(&self, user_id: UserId) -> Option<&Rater> {
        self.ratings.rater(user_id)
    }

    /// Exact title lookup
    pub fn resolve_title(&self, title: &str) -> Option<ItemId> {
        self.titles.get(title).copied()
    }

    pub fn title_of(&self, id: ItemId) -> Option<&str> {
        self.item(id).map(|item| item.title.as_str())
    }

    /// Every registered title with the id it resolves to, in no particular order
    pub fn titles(&self) -> impl Iterator<Item = (&str, ItemId)> {
        self.titles.iter().map(|(title, &id)| (title.as_str(), id))
    }

    pub fn all_item_ids(&self) -> Vec<ItemId> {
        self.index.ids()
    }

    /// Sample `count` item ids uniformly, with replacement
    pub fn random_item_ids<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<ItemId> {
        let ids = self.all_item_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| ids[rng.random_range(0..ids.len())])
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let item_ratings = self.ratings.item_rating_count();
        let user_ratings = self.ratings.rating_count();
        CatalogStats {
            items: self.len(),
            users: self.ratings.user_count(),
            item_ratings,
            user_ratings,
            approx_rating_bytes: (item_ratings + user_ratings) * std::mem::size_of::<(ItemId, Rating)>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .insert_item(1, "Toy Story (1995)", vec!["Animation".into(), "Comedy".into()])
            .unwrap();
        catalog.insert_item(2, "Jumanji (1995)", vec!["Adventure".into()]).unwrap();
        catalog.insert_item(3, "Heat (1995)", vec!["Action".into()]).unwrap();
        catalog
    }

    #[test]
    fn test_insert_registers_title() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.resolve_title("Heat (1995)"), Some(3));
        assert_eq!(catalog.title_of(2), Some("Jumanji (1995)"));
        assert_eq!(catalog.resolve_title("heat (1995)"), None);
    }

    #[test]
    fn test_duplicate_item_keeps_first_title() {
        let mut catalog = sample();
        let err = catalog.insert_item(3, "Other", vec![]).unwrap_err();
        assert_eq!(err, Error::DuplicateItem(3));
        assert_eq!(catalog.resolve_title("Other"), None);
        assert_eq!(catalog.title_of(3), Some("Heat (1995)"));
    }

    #[test]
    fn test_record_rating_validates_range() {
        let mut catalog = sample();
        catalog.record_rating(10, 1, 4.0).unwrap();
        assert!(matches!(
            catalog.record_rating(10, 2, 6.0),
            Err(Error::RatingOutOfRange { .. })
        ));
        assert_eq!(catalog.ratings_of(10).unwrap().len(), 1);
        assert_eq!(catalog.raters_of(1).unwrap().get(&10), Some(&4.0));
        assert!(catalog.raters_of(2).is_none());
    }

    #[test]
    fn test_remove_item_drops_title() {
        let mut catalog = sample();
        assert_eq!(catalog.remove_item(2).map(|i| i.id), Some(2));
        assert!(catalog.item(2).is_none());
        assert_eq!(catalog.resolve_title("Jumanji (1995)"), None);
        assert!(catalog.remove_item(2).is_none());
        catalog.index().validate().unwrap();
    }

    #[test]
    fn test_removing_newest_holder_keeps_shared_title() {
        let mut catalog = Catalog::new();
        catalog.insert_item(3, "Hamlet (1996)", vec![]).unwrap();
        catalog.insert_item(5, "Hamlet (1996)", vec![]).unwrap();
        catalog.insert_item(8, "Hamlet (1996)", vec![]).unwrap();
        assert_eq!(catalog.resolve_title("Hamlet (1996)"), Some(8));

        catalog.remove_item(8).unwrap();
        assert_eq!(catalog.resolve_title("Hamlet (1996)"), Some(5));

        // a non-holder leaving does not move the title
        catalog.remove_item(3).unwrap();
        assert_eq!(catalog.resolve_title("Hamlet (1996)"), Some(5));

        catalog.remove_item(5).unwrap();
        assert_eq!(catalog.resolve_title("Hamlet (1996)"), None);
    }

    #[test]
    fn test_stats_counts_both_directions() {
        let mut catalog = sample();
        catalog.record_rating(1, 1, 4.0).unwrap();
        catalog.record_rating(1, 2, 3.0).unwrap();
        catalog.record_rating(2, 1, 5.0).unwrap();

        let stats = catalog.stats();
        assert_eq!(stats.items, 3);
        assert_eq!(stats.users, 2);
        assert_eq!(stats.item_ratings, 3);
        assert_eq!(stats.user_ratings, 3);
        assert_eq!(stats.approx_rating_bytes, 6 * std::mem::size_of::<(ItemId, Rating)>());
    }

    #[test]
    fn test_random_item_ids_come_from_catalog() {
        let catalog = sample();
        let mut rng = StdRng::seed_from_u64(1);
        let ids = catalog.random_item_ids(50, &mut rng);
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| catalog.contains(*id)));

        assert!(Catalog::new().random_item_ids(5, &mut rng).is_empty());
    }
}
