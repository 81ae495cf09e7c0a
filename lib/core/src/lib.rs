//! # cinematch Core
//!
//! Core library for the cinematch recommender.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`CatalogIndex`] - Red-black ordered index from item id to [`Item`]
//! - [`RatingStore`] - Sparse ratings indexed by user and by item
//! - [`Catalog`] - Index, ratings and title table owned together
//! - [`TopK`] - Bounded top-k selection with deterministic tie-breaking
//! - [`RecommendConfig`] - Tunables shared by the recommendation pipeline
//!
//! ## Example
//!
//! ```rust
//! use cinematch_core::Catalog;
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_item(1, "Toy Story (1995)", vec!["Animation".into(), "Comedy".into()]).unwrap();
//! catalog.insert_item(2, "Heat (1995)", vec!["Action".into()]).unwrap();
//! catalog.record_rating(7, 1, 4.5).unwrap();
//!
//! assert_eq!(catalog.resolve_title("Heat (1995)"), Some(2));
//! assert_eq!(catalog.raters_of(1).map(|r| r.len()), Some(1));
//! let ids: Vec<_> = catalog.items().map(|item| item.id).collect();
//! assert_eq!(ids, vec![1, 2]);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod item;
pub mod ratings;
pub mod topk;

pub use catalog::{Catalog, CatalogStats};
pub use config::RecommendConfig;
pub use error::{Error, Result};
pub use index::CatalogIndex;
pub use item::{validate_rating, Item, ItemId, Rater, Rating, UserId, MAX_RATING, MIN_RATING};
pub use ratings::RatingStore;
pub use topk::{top_k, ScoredCandidate, TopK};
