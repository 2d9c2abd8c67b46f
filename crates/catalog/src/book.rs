use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Identifier assigned by the store when a book is created.
///
/// Backed by a UUIDv7, so ids are never handed out twice over the life of a
/// store, including after the record they named was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl From<Uuid> for BookId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A committed catalog record. Values handed out by the store are copies;
/// changing one never touches stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Input for [`CatalogStore::create`](crate::CatalogStore::create).
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: Decimal,
    pub stock: u32,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        price: Decimal,
        stock: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            price,
            stock,
        }
    }
}

/// Partial update. `None` leaves the stored value alone.
///
/// Text fields that are present but blank are treated as absent, while a
/// present `price` or `stock` is always applied, zero included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
}

impl BookPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn book_serializes_with_camel_case_keys() {
        let book = Book {
            id: BookId::from(Uuid::nil()),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "fiction".to_string(),
            price: Decimal::new(3990, 2),
            stock: 5,
            created_at: datetime!(2024-05-01 12:00 UTC),
            updated_at: datetime!(2024-05-02 08:30 UTC),
        };

        let value = serde_json::to_value(&book).unwrap();

        assert_eq!(value["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(value["price"], 39.9);
        assert_eq!(value["stock"], 5);
        assert_eq!(value["createdAt"], "2024-05-01T12:00:00Z");
        assert_eq!(value["updatedAt"], "2024-05-02T08:30:00Z");
    }

    #[test]
    fn book_id_parses_its_display_form() {
        let id = BookId::generate();
        let parsed: BookId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<BookId>().is_err());
    }
}
