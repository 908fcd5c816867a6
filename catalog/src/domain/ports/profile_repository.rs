//! Port for the persisted session profile.

use crate::domain::UserProfile;

use super::PersistenceError;

/// Storage for the single signed-in profile.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileRepository: Send + Sync {
    /// Load the stored profile.
    ///
    /// A stored value that no longer decodes is removed and reported as
    /// `None`, leaving the session signed out.
    fn load(&self) -> Option<UserProfile>;

    /// Store `profile` as the signed-in profile.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Write`] when the backend rejects the
    /// write.
    fn save(&self, profile: &UserProfile) -> Result<(), PersistenceError>;

    /// Remove the stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Remove`] when the backend cannot delete
    /// the value.
    fn clear(&self) -> Result<(), PersistenceError>;
}

/// Fixture implementation with no stored profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

impl ProfileRepository for FixtureProfileRepository {
    fn load(&self) -> Option<UserProfile> {
        None
    }

    fn save(&self, _profile: &UserProfile) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
