//! Validated storage keys.

use std::fmt;

use thiserror::Error;

/// Maximum key length in characters.
const MAX_KEY_LEN: usize = 128;

/// Key under which a blob is stored.
///
/// Keys double as file names in [`crate::DirStore`], so they are limited to
/// ASCII letters, digits, `_`, `-` and `.`, and must not start with `.`
/// (temporary files written during atomic replacement use that prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    /// Validate and construct a key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageKeyError`] when the key is empty, padded with
    /// whitespace, too long, hidden, or contains unsupported characters.
    ///
    /// # Examples
    /// ```
    /// use local_store::StorageKey;
    ///
    /// let key = StorageKey::new("favorites.42").expect("valid key");
    /// assert_eq!(key.as_str(), "favorites.42");
    /// assert!(StorageKey::new("../escape").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, StorageKeyError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(StorageKeyError::Empty);
        }
        if raw.trim() != raw {
            return Err(StorageKeyError::ContainsWhitespace);
        }
        if raw.chars().count() > MAX_KEY_LEN {
            return Err(StorageKeyError::TooLong { max: MAX_KEY_LEN });
        }
        if raw.starts_with('.') {
            return Err(StorageKeyError::Hidden);
        }
        if let Some(character) = raw.chars().find(|c| !is_key_char(*c)) {
            return Err(StorageKeyError::InvalidCharacter { character });
        }
        Ok(Self(raw))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// File name used by directory-backed stores.
    pub(crate) fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

const fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`StorageKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageKeyError {
    /// Key is empty after trimming whitespace.
    #[error("storage key must not be empty")]
    Empty,
    /// Key has leading or trailing whitespace.
    #[error("storage key must not contain surrounding whitespace")]
    ContainsWhitespace,
    /// Key exceeds the maximum length.
    #[error("storage key must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Key starts with a dot.
    #[error("storage key must not start with '.'")]
    Hidden,
    /// Key contains a character outside the accepted set.
    #[error("storage key contains unsupported character {character:?}")]
    InvalidCharacter {
        /// The first offending character.
        character: char,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::session("brewsky_user")]
    #[case::scoped("favorites.8f0c2a9e-2b1d-4c59-9d0e-6d7b0b1f4a11")]
    #[case::dashed("user-cards")]
    fn accepts_plain_keys(#[case] raw: &str) {
        let key = StorageKey::new(raw).expect("valid key");
        assert_eq!(key.as_str(), raw);
    }

    #[rstest]
    #[case::empty("", StorageKeyError::Empty)]
    #[case::blank("   ", StorageKeyError::Empty)]
    #[case::padded(" cards", StorageKeyError::ContainsWhitespace)]
    #[case::hidden(".cards", StorageKeyError::Hidden)]
    #[case::separator("a/b", StorageKeyError::InvalidCharacter { character: '/' })]
    #[case::colon("a:b", StorageKeyError::InvalidCharacter { character: ':' })]
    fn rejects_invalid_keys(#[case] raw: &str, #[case] expected: StorageKeyError) {
        assert_eq!(StorageKey::new(raw), Err(expected));
    }

    #[test]
    fn rejects_overlong_keys() {
        let raw = "k".repeat(MAX_KEY_LEN + 1);
        assert_eq!(
            StorageKey::new(raw),
            Err(StorageKeyError::TooLong { max: MAX_KEY_LEN })
        );
    }

    #[test]
    fn file_name_appends_json_extension() {
        let key = StorageKey::new("brewsky_cards").expect("valid key");
        assert_eq!(key.file_name(), "brewsky_cards.json");
    }
}
