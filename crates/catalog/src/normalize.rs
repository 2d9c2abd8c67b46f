//! Case folding and blank handling shared by every comparison in the store.

/// Locale-independent case fold used for all equality and substring checks.
pub(crate) fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Case-insensitive equality of two already-trimmed values.
pub(crate) fn eq_folded(left: &str, right: &str) -> bool {
    left == right || fold(left) == fold(right)
}

/// Trimmed value, or `None` when absent or only whitespace.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}
