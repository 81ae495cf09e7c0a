//! # cinematch Similarity
//!
//! Scoring and ranking on top of a [`cinematch_core::Catalog`].
//!
//! ## Features
//!
//! - **Pearson correlation** over sparse rating vectors with a minimum overlap
//! - **Rater neighbourhoods** for an item, most similar first
//! - **Genre overlap** for content-based scoring
//! - **Recommendation pipeline**: collaborative and content strategies with
//!   bounded top-k selection
//! - **Title resolution**: exact lookup plus case-insensitive Levenshtein
//!   suggestions
//!
//! ## Example
//!
//! ```rust
//! use cinematch_core::{Catalog, RecommendConfig};
//! use cinematch_similarity::{Recommender, TitleResolver};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_item(1, "Alien (1979)", vec!["Horror".into(), "Sci-Fi".into()]).unwrap();
//! catalog.insert_item(2, "Aliens (1986)", vec!["Action".into(), "Sci-Fi".into()]).unwrap();
//! catalog.insert_item(3, "Heat (1995)", vec!["Crime".into()]).unwrap();
//!
//! let config = RecommendConfig::default();
//! let resolver = TitleResolver::new(&catalog, &config);
//! assert_eq!(resolver.resolve("Alien (1979)"), Some(1));
//! assert_eq!(resolver.suggest("alien (1979)")[0].title, "Alien (1979)");
//!
//! let recommender = Recommender::new(&catalog, config);
//! let similar = recommender.content(1, 1);
//! assert_eq!(similar[0].item.id, 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Pearson   │────>│  Neighbors  │────>│             │
//! └─────────────┘     └─────────────┘     │ Recommender │──> top-k
//! ┌─────────────┐                         │             │
//! │   Overlap   │────────────────────────>│             │
//! └─────────────┘                         └─────────────┘
//! ┌─────────────┐     ┌─────────────┐
//! │ Levenshtein │────>│  Resolver   │──> exact id / suggestions
//! └─────────────┘     └─────────────┘
//! ```

pub mod neighbors;
pub mod overlap;
pub mod pearson;
pub mod recommend;
pub mod resolver;
pub mod text;

pub use neighbors::{neighbors_of, Neighbor};
pub use overlap::{genre_overlap, item_overlap};
pub use pearson::{pearson_correlation, MIN_COMMON_RATINGS};
pub use recommend::{BenchmarkReport, Recommendation, Recommender};
pub use resolver::{TitleMatch, TitleResolver, TitleSuggestion};
pub use text::{levenshtein, title_similarity};
