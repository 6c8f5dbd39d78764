//! Class-name list helpers.
//!
//! Presentation layers build element class names from optional parts; these
//! helpers drop the missing or empty ones.

/// Join the present, non-empty parts with `sep`.
///
pub fn filter_join(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<&str>>()
        .join(sep)
}

/// Join the present, non-empty class names with spaces.
///
pub fn class_list(classes: &[Option<&str>]) -> String {
    filter_join(classes, " ")
}
