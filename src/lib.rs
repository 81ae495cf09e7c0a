//! # cinematch
//!
//! An in-memory movie catalog with two recommendation strategies.
//!
//! Items live in a red-black ordered index keyed by id, ratings in a sparse
//! store indexed both by user and by item. Queries borrow the catalog
//! immutably, so a loaded catalog can be shared by any number of readers.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! cinematch --movies data/movies.csv --ratings data/ratings.csv recommend "Toy Story (1995)"
//! cinematch --movies data/movies.csv --ratings data/ratings.csv bench --queries 100
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use cinematch::prelude::*;
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_item(1, "Toy Story (1995)", vec!["Animation".into(), "Comedy".into()]).unwrap();
//! catalog.insert_item(2, "Toy Story 2 (1999)", vec!["Animation".into(), "Comedy".into()]).unwrap();
//! catalog.insert_item(3, "Heat (1995)", vec!["Crime".into()]).unwrap();
//!
//! let config = RecommendConfig::default();
//! let resolver = TitleResolver::new(&catalog, &config);
//! let id = resolver.resolve("Toy Story (1995)").unwrap();
//!
//! let recommender = Recommender::new(&catalog, config);
//! let similar = recommender.content(id, 2);
//! assert_eq!(similar[0].item.title, "Toy Story 2 (1999)");
//! ```
//!
//! ## Crate Structure
//!
//! - `cinematch-core` - Catalog index, rating store, bounded top-k, config
//! - `cinematch-similarity` - Pearson neighbourhoods, genre overlap, recommendation pipeline, title resolution
//! - `cinematch-ingest` - CSV loaders for movie and rating files

// Re-export core types
pub use cinematch_core::{
    Catalog, CatalogIndex, CatalogStats, RatingStore,
    Item, ItemId, Rater, Rating, UserId,
    RecommendConfig, ScoredCandidate, TopK,
    Error, Result,
};

// Re-export similarity
pub use cinematch_similarity::{
    BenchmarkReport, Neighbor, Recommendation, Recommender,
    TitleMatch, TitleResolver, TitleSuggestion,
};

// Re-export ingestion
pub use cinematch_ingest::{load_dataset, IngestError, LoadReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, Item, ItemId, UserId, Rating,
        RecommendConfig, Recommendation, Recommender,
        TitleMatch, TitleResolver,
        load_dataset, LoadReport,
        Error, Result,
    };
}

/// Scoring primitives
pub mod scoring {
    pub use cinematch_similarity::{genre_overlap, levenshtein, neighbors_of, pearson_correlation, title_similarity};
}
