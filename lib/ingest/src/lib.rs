//! # cinematch Ingest
//!
//! Loads MovieLens-style CSV files into a [`cinematch_core::Catalog`].
//!
//! ```text
//! movies.csv   movieId,title,genres        genres split on '|'
//! ratings.csv  userId,movieId,rating,...   extra columns ignored
//! ```
//!
//! Ratings for movies missing from the catalog are still recorded in the
//! rating store and counted as orphans in the [`LoadReport`].

pub mod error;
pub mod genres;
pub mod loader;

pub use error::{IngestError, Result};
pub use loader::{load_dataset, load_movies, load_ratings, read_movies, read_ratings, LoadReport};
