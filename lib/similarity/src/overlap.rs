//! Categorical overlap between items

use cinematch_core::Item;

/// Number of matching tag pairs between two tag lists
///
/// Every pair `(x, y)` with `x == y` adds 1.0, so repeated tags count once
/// per match. There is no normalisation by list length.
pub fn genre_overlap<A, B>(a: &[A], b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    a.iter()
        .map(|x| b.iter().filter(|y| x.as_ref() == y.as_ref()).count())
        .sum::<usize>() as f64
}

/// [`genre_overlap`] of two items' genre lists
#[inline]
pub fn item_overlap(a: &Item, b: &Item) -> f64 {
    genre_overlap(&a.genres, &b.genres)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shared_genre() {
        assert_eq!(genre_overlap(&["Action", "Comedy"], &["Action", "Drama"]), 1.0);
    }

    #[test]
    fn test_disjoint_and_empty() {
        assert_eq!(genre_overlap(&["Horror"], &["Romance"]), 0.0);
        assert_eq!(genre_overlap::<&str, &str>(&[], &["Romance"]), 0.0);
    }

    #[test]
    fn test_repeated_tags_count_per_pair() {
        assert_eq!(genre_overlap(&["Drama", "Drama"], &["Drama"]), 2.0);
        assert_eq!(genre_overlap(&["Drama", "Drama"], &["Drama", "Drama"]), 4.0);
    }

    #[test]
    fn test_item_overlap_is_case_sensitive() {
        let a = Item::new(1, "A").with_genres(["Sci-Fi", "Thriller"]);
        let b = Item::new(2, "B").with_genres(["sci-fi", "Thriller"]);
        assert_eq!(item_overlap(&a, &b), 1.0);
    }
}
