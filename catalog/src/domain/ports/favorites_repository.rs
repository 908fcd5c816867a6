//! Port for per-user favorites persistence.

use crate::domain::{CoffeeShopRecord, UserId};

use super::PersistenceError;

/// Storage for each user's ordered favorite snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait FavoritesRepository: Send + Sync {
    /// Load `user`'s favorites; empty when none are stored or the stored
    /// value is unreadable.
    fn load(&self, user: &UserId) -> Vec<CoffeeShopRecord>;

    /// Replace `user`'s favorites.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Write`] when the backend rejects the
    /// write.
    fn save(&self, user: &UserId, favorites: &[CoffeeShopRecord]) -> Result<(), PersistenceError>;
}

/// Fixture implementation that starts empty and discards saves.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavoritesRepository;

impl FavoritesRepository for FixtureFavoritesRepository {
    fn load(&self, _user: &UserId) -> Vec<CoffeeShopRecord> {
        Vec::new()
    }

    fn save(&self, _user: &UserId, _favorites: &[CoffeeShopRecord]) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_repository_lookup_is_empty() {
        let user = UserId::for_email("ada@example.com");
        assert!(FixtureFavoritesRepository.load(&user).is_empty());
    }
}
