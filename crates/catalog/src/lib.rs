//! Authoritative in-memory catalog of book records.
//!
//! [`CatalogStore`] is the only writer of [`Book`] state. It enforces the
//! genre allow-list and the case-insensitive title/author uniqueness rule,
//! keeps `created_at`/`updated_at` consistent, and answers filtered reads in
//! insertion order. Every operation runs under a single lock.

pub mod book;
pub mod clock;
pub mod error;
pub mod filter;
pub mod genre;
mod normalize;
pub mod store;

pub use book::{Book, BookId, BookPatch, NewBook};
pub use clock::{Clock, SystemClock};
pub use error::{AllowListError, CatalogError, CatalogResult, ErrorKind};
pub use filter::BookFilter;
pub use genre::{GenreAllowList, DEFAULT_GENRES};
pub use store::CatalogStore;
