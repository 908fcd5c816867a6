//! Port for user-submitted shop persistence.

use crate::domain::CoffeeShopRecord;

use super::PersistenceError;

/// Storage for the user-added slice of the catalog.
///
/// Presets are constants and never pass through this port. The whole list
/// is written on every mutation, newest first.
#[cfg_attr(test, mockall::automock)]
pub trait ShopRepository: Send + Sync {
    /// Load the stored user-added shops, or an empty list when none exist
    /// or the stored value is unreadable.
    fn load(&self) -> Vec<CoffeeShopRecord>;

    /// Replace the stored list.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Write`] when the backend rejects the
    /// write.
    fn save(&self, shops: &[CoffeeShopRecord]) -> Result<(), PersistenceError>;
}

/// Fixture implementation that starts empty and discards saves.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShopRepository;

impl ShopRepository for FixtureShopRepository {
    fn load(&self) -> Vec<CoffeeShopRecord> {
        Vec::new()
    }

    fn save(&self, _shops: &[CoffeeShopRecord]) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn fixture_repository_starts_empty() {
        assert!(FixtureShopRepository.load().is_empty());
    }

    #[rstest]
    fn fixture_repository_accepts_saves() {
        FixtureShopRepository
            .save(&crate::domain::preset_shops())
            .expect("fixture save should succeed");
    }

    #[rstest]
    fn write_error_formats_key_and_message() {
        let error = PersistenceError::write("brewsky_cards", "disk full");
        assert_eq!(error.to_string(), "failed to persist brewsky_cards: disk full");
    }
}
