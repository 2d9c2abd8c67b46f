//! Error types for the catalog store

use rust_decimal::Decimal;
use thiserror::Error;

use crate::book::BookId;

/// Broad class of a store rejection, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A supplied value breaks a rule the store enforces
    Validation,
    /// The write would duplicate an existing title/author pair
    Conflict,
    /// No record has the requested id
    NotFound,
}

/// Rejection of a single store operation. The store state is untouched
/// whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("genre '{genre}' is not allowed")]
    GenreNotAllowed { genre: String, allowed: Vec<String> },

    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    #[error("price must not be negative, got {price}")]
    NegativePrice { price: Decimal },

    #[error("a book titled '{title}' by '{author}' already exists")]
    Duplicate { title: String, author: String },

    #[error("book {0} not found")]
    NotFound(BookId),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::GenreNotAllowed { .. }
            | CatalogError::BlankField { .. }
            | CatalogError::NegativePrice { .. } => ErrorKind::Validation,
            CatalogError::Duplicate { .. } => ErrorKind::Conflict,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type alias for store operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Invalid genre allow-list configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllowListError {
    #[error("genre allow-list must contain at least one label")]
    Empty,

    #[error("genre label at position {position} is blank")]
    BlankLabel { position: usize },

    #[error("genre label '{0}' is listed more than once")]
    DuplicateLabel(String),
}
