//! Title resolution with fuzzy fallback

use cinematch_core::{Catalog, ItemId, RecommendConfig};
use serde::Serialize;

use crate::text::title_similarity;

/// A known title close to an unresolved query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSuggestion {
    pub title: String,
    pub item_id: ItemId,
    pub similarity: f64,
}

/// Outcome of looking a title up
#[derive(Debug, Clone, PartialEq)]
pub enum TitleMatch {
    Exact(ItemId),
    /// No exact match; closest titles first, possibly empty
    Suggestions(Vec<TitleSuggestion>),
}

/// Maps titles to item ids against a catalog's title table
#[derive(Debug, Clone, Copy)]
pub struct TitleResolver<'a> {
    catalog: &'a Catalog,
    threshold: f64,
    limit: usize,
}

impl<'a> TitleResolver<'a> {
    pub fn new(catalog: &'a Catalog, config: &RecommendConfig) -> Self {
        Self {
            catalog,
            threshold: config.suggestion_threshold,
            limit: config.suggestion_limit,
        }
    }

    /// Exact, case-sensitive title match
    pub fn resolve(&self, title: &str) -> Option<ItemId> {
        self.catalog.resolve_title(title)
    }

    pub fn title_of(&self, id: ItemId) -> Option<&'a str> {
        self.catalog.title_of(id)
    }

    /// Titles whose case-insensitive edit similarity to `query` is above the
    /// threshold, best first; ties go to the alphabetically smaller title.
    pub fn suggest(&self, query: &str) -> Vec<TitleSuggestion> {
        let mut suggestions: Vec<TitleSuggestion> = self
            .catalog
            .titles()
            .filter_map(|(title, item_id)| {
                let similarity = title_similarity(query, title);
                (similarity > self.threshold).then(|| TitleSuggestion {
                    title: title.to_string(),
                    item_id,
                    similarity,
                })
            })
            .collect();

        suggestions.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.title.cmp(&b.title))
        });
        suggestions.truncate(self.limit);
        suggestions
    }

    pub fn lookup(&self, title: &str) -> TitleMatch {
        match self.resolve(title) {
            Some(id) => TitleMatch::Exact(id),
            None => TitleMatch::Suggestions(self.suggest(title)),
        }
    }
}
