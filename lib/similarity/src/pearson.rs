//! Pearson correlation over sparse rating vectors
//!
//! Vectors are ordered maps from an id to a rating. Only keys present in
//! both vectors take part; the intersection is found with a merge walk over
//! the two sorted key sequences.

use cinematch_core::Rating;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Fewer shared keys than this and the correlation is defined as 0
pub const MIN_COMMON_RATINGS: usize = 5;

/// Rating pairs for every key present in both vectors, in key order
pub fn common_pairs<K: Ord>(a: &BTreeMap<K, Rating>, b: &BTreeMap<K, Rating>) -> Vec<(f64, f64)> {
    let mut pairs = Vec::with_capacity(a.len().min(b.len()));
    let (mut iter_a, mut iter_b) = (a.iter(), b.iter());
    let (mut next_a, mut next_b) = (iter_a.next(), iter_b.next());

    while let (Some((key_a, value_a)), Some((key_b, value_b))) = (next_a, next_b) {
        match key_a.cmp(key_b) {
            Ordering::Less => next_a = iter_a.next(),
            Ordering::Greater => next_b = iter_b.next(),
            Ordering::Equal => {
                pairs.push((f64::from(*value_a), f64::from(*value_b)));
                next_a = iter_a.next();
                next_b = iter_b.next();
            }
        }
    }
    pairs
}

/// Pearson correlation in `[-1, 1]` restricted to the shared keys
///
/// Returns 0 when fewer than [`MIN_COMMON_RATINGS`] keys are shared, or when
/// either side has zero variance over the shared keys.
pub fn pearson_correlation<K: Ord>(a: &BTreeMap<K, Rating>, b: &BTreeMap<K, Rating>) -> f64 {
    correlation_of_pairs(&common_pairs(a, b))
}

/// Pearson correlation of already-aligned pairs
pub fn correlation_of_pairs(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < MIN_COMMON_RATINGS {
        return 0.0;
    }

    let (sum_a, sum_b) = pairs
        .iter()
        .fold((0.0, 0.0), |(sa, sb), (x, y)| (sa + x, sb + y));
    let mean_a = sum_a / n as f64;
    let mean_b = sum_b / n as f64;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in pairs {
        let da = x - mean_a;
        let db = y - mean_b;
        covariance += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }

    (covariance / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(i64, Rating)]) -> BTreeMap<i64, Rating> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_common_pairs_intersects_keys() {
        let a = vector(&[(1, 1.0), (3, 3.0), (5, 5.0), (7, 2.0)]);
        let b = vector(&[(2, 4.0), (3, 1.0), (7, 4.5), (9, 2.0)]);
        assert_eq!(common_pairs(&a, &b), vec![(3.0, 1.0), (2.0, 4.5)]);
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let a = vector(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0)]);
        let b = vector(&[(1, 1.5), (2, 2.0), (3, 2.5), (4, 3.0), (5, 3.5)]);
        let c = vector(&[(1, 5.0), (2, 4.0), (3, 3.0), (4, 2.0), (5, 1.0)]);
        assert!((pearson_correlation(&a, &b) - 1.0).abs() < 1e-9);
        assert!((pearson_correlation(&a, &c) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let a = vector(&[(1, 4.0), (2, 2.5), (3, 5.0), (4, 1.0), (5, 3.5), (6, 2.0)]);
        let b = vector(&[(1, 3.0), (2, 3.5), (3, 4.5), (4, 2.0), (5, 2.5), (8, 5.0)]);
        assert_eq!(pearson_correlation(&a, &b), pearson_correlation(&b, &a));
        assert!(pearson_correlation(&a, &b) > 0.0);
    }

    #[test]
    fn test_too_few_common_keys_is_zero() {
        let a = vector(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (10, 5.0)]);
        let b = vector(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (11, 5.0)]);
        assert_eq!(pearson_correlation(&a, &b), 0.0);
    }

    #[test]
    fn test_zero_variance_is_zero() {
        let flat = vector(&[(1, 5.0), (2, 5.0), (3, 5.0), (4, 5.0), (5, 5.0)]);
        assert_eq!(pearson_correlation(&flat, &flat), 0.0);

        let varied = vector(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0)]);
        assert_eq!(pearson_correlation(&flat, &varied), 0.0);
    }

    #[test]
    fn test_result_is_bounded() {
        let a = vector(&[(1, 0.5), (2, 0.5), (3, 0.5), (4, 0.5), (5, 5.0)]);
        let r = pearson_correlation(&a, &a);
        assert!(r <= 1.0 && r >= -1.0);
    }
}
