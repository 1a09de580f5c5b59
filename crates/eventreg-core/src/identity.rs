//! Name normalization used to match registrations to children.
//!
//! Registrations only carry the child's display name, never a child id, so
//! two names refer to the same child exactly when their normalized forms are
//! equal. Children sharing a normalized name cannot be told apart.

/// Trims, collapses internal whitespace runs to one space and lowercases.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Name equality for matching purposes.
pub fn same_person(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
