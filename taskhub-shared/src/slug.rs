//! Slug derivation for user and task names
//!
//! Slugs are URL-safe tokens derived from a human-readable field
//! (`username` for users, `title` for tasks). They are recomputed on every
//! create and update and are never accepted from callers.
//!
//! # Rules
//!
//! - ASCII letters and digits are kept and lowercased
//! - Any run of other ASCII characters becomes a single `-`
//! - Non-ASCII characters are dropped
//! - Leading and trailing separators are trimmed
//!
//! # Example
//!
//! ```
//! use taskhub_shared::slug::slugify;
//!
//! assert_eq!(slugify("Buy Milk & Eggs"), "buy-milk-eggs");
//! ```

/// Separator placed between alphanumeric runs
pub const SEPARATOR: char = '-';

/// Derives a slug from a display name
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii() {
            pending_separator = true;
        }
    }

    slug
}

/// Returns true if `input` yields a non-empty slug
///
/// Used by request validation so that no row is stored with an empty slug.
pub fn is_sluggable(input: &str) -> bool {
    input.chars().any(|ch| ch.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("alice"), "alice");
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("foo/bar\\baz"), "foo-bar-baz");
    }

    #[test]
    fn test_slugify_collapses_and_trims_separators() {
        assert_eq!(slugify("  --Write   the__report!!  "), "write-the-report");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("café au lait"), "caf-au-lait");
        assert_eq!(slugify("emoji 😀 test"), "emoji-test");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let name = "Quarterly Review 2025";
        assert_eq!(slugify(name), slugify(name));
        assert_eq!(slugify(name), "quarterly-review-2025");
    }

    #[test]
    fn test_is_sluggable() {
        assert!(is_sluggable("bob"));
        assert!(is_sluggable("  x  "));
        assert!(!is_sluggable("!!!"));
        assert!(!is_sluggable("привет"));
        assert!(!is_sluggable(""));
    }
}
