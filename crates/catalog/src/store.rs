use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use crate::book::{Book, BookId, BookPatch, NewBook};
use crate::clock::{Clock, SystemClock};
use crate::error::{CatalogError, CatalogResult};
use crate::filter::BookFilter;
use crate::genre::GenreAllowList;
use crate::normalize::{eq_folded, non_blank};

/// Owner of every book record.
///
/// Records live in an insertion-ordered map behind one lock. Each operation
/// holds the lock from its first check to its last write, so a uniqueness
/// check and the insert or update that follows it cannot interleave with
/// another call.
pub struct CatalogStore {
    books: RwLock<IndexMap<BookId, Book>>,
    genres: GenreAllowList,
    clock: Arc<dyn Clock>,
}

impl CatalogStore {
    pub fn new(genres: GenreAllowList) -> Self {
        Self::with_clock(genres, Arc::new(SystemClock))
    }

    pub fn with_clock(genres: GenreAllowList, clock: Arc<dyn Clock>) -> Self {
        Self {
            books: RwLock::new(IndexMap::new()),
            genres,
            clock,
        }
    }

    /// Genre labels accepted by this store, in configured order.
    pub fn allowed_genres(&self) -> &[String] {
        self.genres.labels()
    }

    /// Whether a record other than `excluding` already uses this title and
    /// author, compared case-insensitively after trimming.
    pub fn exists_by_title_and_author(
        &self,
        title: &str,
        author: &str,
        excluding: Option<BookId>,
    ) -> bool {
        let books = self.books.read();
        collides(&books, title.trim(), author.trim(), excluding)
    }

    pub fn create(&self, new: NewBook) -> CatalogResult<Book> {
        let title = required("title", &new.title)?;
        let author = required("author", &new.author)?;
        let genre = self.allowed_genre(&new.genre)?;
        non_negative(new.price)?;

        let mut books = self.books.write();

        if collides(&books, title, author, None) {
            tracing::debug!(%title, %author, "rejected duplicate book");
            return Err(CatalogError::Duplicate {
                title: title.to_string(),
                author: author.to_string(),
            });
        }

        let now = self.clock.now();
        let book = Book {
            id: BookId::generate(),
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            price: new.price,
            stock: new.stock,
            created_at: now,
            updated_at: now,
        };
        books.insert(book.id, book.clone());

        tracing::info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Books matching every supplied filter, in insertion order.
    pub fn get_all(&self, filter: &BookFilter) -> Vec<Book> {
        let compiled = filter.compile();
        let books = self.books.read();

        books
            .values()
            .filter(|book| compiled.matches(book))
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, id: BookId) -> CatalogResult<Book> {
        self.books
            .read()
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// Apply `patch` to the book with `id` and return the committed record.
    ///
    /// Checks run in order: existence, genre, price, then uniqueness of the
    /// title/author pair the record would end up with. `updated_at` moves
    /// forward whenever at least one field is applied; an empty patch leaves
    /// the record untouched.
    pub fn update(&self, id: BookId, patch: BookPatch) -> CatalogResult<Book> {
        let title = non_blank(patch.title.as_deref());
        let author = non_blank(patch.author.as_deref());
        let genre = non_blank(patch.genre.as_deref());

        let mut books = self.books.write();
        let index = books.get_index_of(&id).ok_or(CatalogError::NotFound(id))?;

        if let Some(genre) = genre {
            self.allowed_genre(genre)?;
        }
        if let Some(price) = patch.price {
            non_negative(price)?;
        }

        if title.is_some() || author.is_some() {
            let current = &books[index];
            let next_title = title.unwrap_or(current.title.as_str());
            let next_author = author.unwrap_or(current.author.as_str());

            if collides(&books, next_title, next_author, Some(id)) {
                tracing::debug!(
                    book_id = %id,
                    title = %next_title,
                    author = %next_author,
                    "rejected conflicting update"
                );
                return Err(CatalogError::Duplicate {
                    title: next_title.to_string(),
                    author: next_author.to_string(),
                });
            }
        }

        let applies_any = title.is_some()
            || author.is_some()
            || genre.is_some()
            || patch.price.is_some()
            || patch.stock.is_some();

        let book = &mut books[index];
        if !applies_any {
            return Ok(book.clone());
        }

        if let Some(title) = title {
            book.title = title.to_string();
        }
        if let Some(author) = author {
            book.author = author.to_string();
        }
        if let Some(genre) = genre {
            book.genre = genre.to_string();
        }
        if let Some(price) = patch.price {
            book.price = price;
        }
        if let Some(stock) = patch.stock {
            book.stock = stock;
        }
        book.updated_at = next_timestamp(book.updated_at, self.clock.now());

        tracing::info!(book_id = %id, "book updated");
        Ok(book.clone())
    }

    /// Delete the book with `id`. Returns `false` when nothing was stored under it.
    pub fn remove(&self, id: BookId) -> bool {
        let removed = self.books.write().shift_remove(&id).is_some();
        if removed {
            tracing::info!(book_id = %id, "book removed");
        } else {
            tracing::debug!(book_id = %id, "remove of unknown book ignored");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// Trimmed genre if it is on the allow-list.
    fn allowed_genre<'a>(&self, genre: &'a str) -> CatalogResult<&'a str> {
        let genre = genre.trim();
        if self.genres.contains(genre) {
            Ok(genre)
        } else {
            tracing::debug!(%genre, "rejected genre outside allow-list");
            Err(CatalogError::GenreNotAllowed {
                genre: genre.to_string(),
                allowed: self.genres.labels().to_vec(),
            })
        }
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(GenreAllowList::default())
    }
}

fn collides(
    books: &IndexMap<BookId, Book>,
    title: &str,
    author: &str,
    excluding: Option<BookId>,
) -> bool {
    books.values().any(|book| {
        Some(book.id) != excluding
            && eq_folded(&book.title, title)
            && eq_folded(&book.author, author)
    })
}

fn required<'a>(field: &'static str, value: &'a str) -> CatalogResult<&'a str> {
    non_blank(Some(value)).ok_or(CatalogError::BlankField { field })
}

fn non_negative(price: Decimal) -> CatalogResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CatalogError::NegativePrice { price });
    }
    Ok(())
}

/// Clock reading for a mutation, nudged past `previous` when the clock has
/// not moved on since the last write.
fn next_timestamp(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    if now > previous {
        now
    } else {
        previous + Duration::NANOSECOND
    }
}
