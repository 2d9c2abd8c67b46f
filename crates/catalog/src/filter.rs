use serde::Deserialize;

use crate::book::Book;
use crate::normalize::{fold, non_blank};

/// Optional listing filters, combined with AND. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookFilter {
    /// Case-insensitive exact match on genre
    pub genre: Option<String>,
    /// Case-insensitive substring of author
    pub author: Option<String>,
    /// Case-insensitive substring of title
    pub title: Option<String>,
}

impl BookFilter {
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub(crate) fn compile(&self) -> CompiledFilter {
        let mut predicates = Vec::new();

        if let Some(genre) = needle(self.genre.as_deref()) {
            predicates.push(Predicate::GenreEquals(genre));
        }
        if let Some(author) = needle(self.author.as_deref()) {
            predicates.push(Predicate::AuthorContains(author));
        }
        if let Some(title) = needle(self.title.as_deref()) {
            predicates.push(Predicate::TitleContains(title));
        }

        CompiledFilter { predicates }
    }
}

/// Folded filter value. Blank detection trims; the needle itself is used as given.
fn needle(value: Option<&str>) -> Option<String> {
    non_blank(value).and(value).map(fold)
}

#[derive(Debug)]
enum Predicate {
    GenreEquals(String),
    AuthorContains(String),
    TitleContains(String),
}

impl Predicate {
    fn matches(&self, book: &Book) -> bool {
        match self {
            Predicate::GenreEquals(genre) => fold(&book.genre) == *genre,
            Predicate::AuthorContains(needle) => fold(&book.author).contains(needle.as_str()),
            Predicate::TitleContains(needle) => fold(&book.title).contains(needle.as_str()),
        }
    }
}

/// Folded predicates ready for a single pass over the store.
#[derive(Debug)]
pub(crate) struct CompiledFilter {
    predicates: Vec<Predicate>,
}

impl CompiledFilter {
    pub(crate) fn matches(&self, book: &Book) -> bool {
        self.predicates.iter().all(|p| p.matches(book))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.predicates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookId;
    use rust_decimal::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn book(title: &str, author: &str, genre: &str) -> Book {
        let now = OffsetDateTime::UNIX_EPOCH;
        Book {
            id: BookId::from(Uuid::nil()),
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            price: Decimal::ZERO,
            stock: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn matches(filter: BookFilter, book: &Book) -> bool {
        filter.compile().matches(book)
    }

    #[test]
    fn empty_and_blank_filters_match_everything() {
        let dune = book("Dune", "Frank Herbert", "fiction");

        let compiled = BookFilter::default().compile();
        assert_eq!(compiled.len(), 0);
        assert!(compiled.matches(&dune));

        let blank = BookFilter::default().genre("  ").author("");
        let compiled = blank.title("\t").compile();
        assert_eq!(compiled.len(), 0);
        assert!(compiled.matches(&dune));
    }

    #[test]
    fn genre_is_exact_while_author_and_title_are_substrings() {
        let dune = book("Dune", "Frank Herbert", "Fiction");
        let filter = BookFilter::default;

        assert!(matches(filter().genre("FICTION"), &dune));
        assert!(!matches(filter().genre("fict"), &dune));
        assert!(matches(filter().author("herb"), &dune));
        assert!(matches(filter().title("UN"), &dune));
        assert!(!matches(filter().title("dunes"), &dune));
    }

    #[test]
    fn predicates_combine_with_and() {
        let dune = book("Dune", "Frank Herbert", "fiction");
        let filter = BookFilter::default().genre("fiction").author("tolkien");
        assert!(!matches(filter, &dune));
    }
}
