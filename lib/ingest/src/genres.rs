//! Genre field splitting

/// Split a `|`-separated genre field, dropping empty entries
pub fn split_genres(field: &str) -> Vec<String> {
    field
        .split('|')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_genres() {
        assert_eq!(split_genres("Adventure|Animation||Children"), vec!["Adventure", "Animation", "Children"]);
        assert_eq!(split_genres("(no genres listed)"), vec!["(no genres listed)"]);
        assert!(split_genres("").is_empty());
    }
}
