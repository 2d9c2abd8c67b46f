use crate::error::AllowListError;
use crate::normalize::{eq_folded, fold};

/// Built-in genre labels, in display order.
pub const DEFAULT_GENRES: [&str; 6] = [
    "fiction",
    "romance",
    "mystery",
    "fantasy",
    "biography",
    "technology",
];

/// Ordered set of genre labels a book's genre must match, ignoring case.
///
/// Fixed once constructed; the store echoes it back verbatim when it rejects
/// a genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreAllowList {
    labels: Vec<String>,
}

impl GenreAllowList {
    /// Build an allow-list from trimmed labels. Rejects an empty list, blank
    /// labels, and labels that only differ by case.
    pub fn new<I, S>(labels: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut accepted: Vec<String> = Vec::new();

        for (position, label) in labels.into_iter().enumerate() {
            let label = label.into();
            let label = label.trim();
            if label.is_empty() {
                return Err(AllowListError::BlankLabel { position });
            }
            if accepted.iter().any(|known| eq_folded(known, label)) {
                return Err(AllowListError::DuplicateLabel(label.to_string()));
            }
            accepted.push(label.to_string());
        }

        if accepted.is_empty() {
            return Err(AllowListError::Empty);
        }

        Ok(Self { labels: accepted })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Whether `genre` (trimmed) matches a label case-insensitively.
    pub fn contains(&self, genre: &str) -> bool {
        let wanted = fold(genre.trim());
        self.labels.iter().any(|label| fold(label) == wanted)
    }
}

impl Default for GenreAllowList {
    fn default() -> Self {
        Self {
            labels: DEFAULT_GENRES.iter().map(|g| g.to_string()).collect(),
        }
    }
}
