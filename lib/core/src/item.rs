use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

pub type ItemId = i64;
pub type UserId = i64;
pub type Rating = f32;

/// Lowest rating accepted by the catalog (inclusive)
pub const MIN_RATING: Rating = 0.5;
/// Highest rating accepted by the catalog (inclusive)
pub const MAX_RATING: Rating = 5.0;

/// A catalog entry (movie)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Item {
    #[inline]
    #[must_use]
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genres: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// A user together with every rating they have given, keyed by item id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rater {
    pub id: UserId,
    pub ratings: BTreeMap<ItemId, Rating>,
}

impl Rater {
    #[inline]
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ratings: BTreeMap::new(),
        }
    }
}

/// Reject ratings outside `MIN_RATING..=MAX_RATING` (NaN included)
pub fn validate_rating(rating: Rating) -> Result<Rating> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::RatingOutOfRange {
            rating,
            min: MIN_RATING,
            max: MAX_RATING,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder() {
        let item = Item::new(1, "Toy Story (1995)").with_genres(["Animation", "Comedy"]);
        assert_eq!(item.genres.len(), 2);
        assert!(item.has_genre("Comedy"));
        assert!(!item.has_genre("Drama"));
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        assert_eq!(validate_rating(0.5), Ok(0.5));
        assert_eq!(validate_rating(5.0), Ok(5.0));
        assert!(validate_rating(0.0).is_err());
        assert!(validate_rating(5.5).is_err());
        assert!(validate_rating(Rating::NAN).is_err());
    }

    #[test]
    fn test_item_serde_defaults_genres() {
        let item: Item = serde_json::from_str(r#"{"id": 3, "title": "Heat (1995)"}"#).unwrap();
        assert_eq!(item, Item::new(3, "Heat (1995)"));
    }
}
