use thiserror::Error;

use crate::item::{ItemId, Rating};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Item already exists: {0}")]
    DuplicateItem(ItemId),

    #[error("Rating out of range: {rating} (expected {min}..={max})")]
    RatingOutOfRange { rating: Rating, min: Rating, max: Rating },

    #[error("Index invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
