//! Local session: sign-in, sign-out and profile edits.
//!
//! There is no server. Signing in validates the form, builds a profile and
//! stores it under the session key; whoever holds the profile directory is
//! "signed in". The service doubles as the [`SessionProvider`] the catalog
//! and favorites services consult.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    FavoritesRepository, NoticeLevel, Notifier, PersistenceError, ProfileRepository,
    SessionProvider,
};
use crate::domain::{AuthMode, Error, ProfileChanges, SignInRequest, UserId, UserProfile};

/// Session management over a [`ProfileRepository`].
pub struct SessionService<P, F> {
    profiles: Arc<P>,
    favorites: Arc<F>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl<P, F> SessionService<P, F>
where
    P: ProfileRepository,
    F: FavoritesRepository,
{
    /// Create a new service.
    pub const fn new(
        profiles: Arc<P>,
        favorites: Arc<F>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            favorites,
            notifier,
            clock,
        }
    }

    /// Validate `request` and store a fresh profile for it.
    ///
    /// The given name falls back to the email's local part. Favorites
    /// saved under the same email in an earlier session are picked up.
    ///
    /// # Errors
    ///
    /// - [`Error::invalid_request`] with field details for a malformed form.
    /// - [`Error::service_unavailable`] when the profile cannot be stored.
    pub fn sign_in(&self, request: &SignInRequest) -> Result<UserProfile, Error> {
        request.validate().map_err(|errors| {
            Error::invalid_request("Please fix the errors in the form")
                .with_details(errors.to_details())
        })?;

        let profile = UserProfile::new(
            &request.email,
            &request.first_name,
            &request.last_name,
            self.clock.utc(),
        );
        self.store(&profile)?;

        info!(user = %profile.id, mode = ?request.mode, "signed in");
        let message = match request.mode {
            AuthMode::Login => "Login successful!",
            AuthMode::Signup => "Signup successful!",
        };
        self.notifier.notify(NoticeLevel::Success, message);
        Ok(self.hydrate(profile))
    }

    /// Forget the stored profile. Favorites stay on disk for the next
    /// sign-in with the same email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::service_unavailable`] when the profile cannot be
    /// removed.
    pub fn sign_out(&self) -> Result<(), Error> {
        self.profiles
            .clear()
            .map_err(|err| storage_failure(&err))?;
        info!("signed out");
        self.notifier.notify(NoticeLevel::Info, "Signed out");
        Ok(())
    }

    /// The signed-in profile with favorites hydrated, or `None`.
    #[must_use]
    pub fn current_profile(&self) -> Option<UserProfile> {
        self.profiles.load().map(|profile| self.hydrate(profile))
    }

    /// Merge `changes` into the signed-in profile.
    ///
    /// # Errors
    ///
    /// - [`Error::unauthorized`] when nobody is signed in.
    /// - [`Error::invalid_request`] for a malformed replacement email.
    /// - [`Error::service_unavailable`] when the profile cannot be stored.
    ///
    /// A new email changes the user id, so favorites saved under the old id
    /// are merged into the new one.
    pub fn update_profile(&self, changes: ProfileChanges) -> Result<UserProfile, Error> {
        let Some(mut profile) = self.profiles.load() else {
            warn!("profile update without a session");
            return Err(Error::unauthorized("updating a profile requires authentication"));
        };
        let previous = profile.id;
        changes.apply(&mut profile).map_err(|errors| {
            Error::invalid_request("Please fix the errors in the form")
                .with_details(errors.to_details())
        })?;
        if profile.id != previous {
            self.move_favorites(previous, profile.id)?;
        }
        self.store(&profile)?;

        info!(user = %profile.id, "profile updated");
        self.notifier
            .notify(NoticeLevel::Success, "Profile updated successfully!");
        Ok(self.hydrate(profile))
    }

    fn store(&self, profile: &UserProfile) -> Result<(), Error> {
        // Favorites live under their own key; the session blob never carries them.
        let stored = UserProfile {
            favorites: Vec::new(),
            ..profile.clone()
        };
        self.profiles.save(&stored).map_err(|err| {
            self.notifier
                .notify(NoticeLevel::Error, "Authentication failed. Please try again.");
            storage_failure(&err)
        })
    }

    fn move_favorites(&self, from: UserId, to: UserId) -> Result<(), Error> {
        let carried = self.favorites.load(&from);
        if carried.is_empty() {
            return Ok(());
        }
        let mut merged = self.favorites.load(&to);
        for shop in carried {
            if !merged.iter().any(|existing| existing.id == shop.id) {
                merged.push(shop);
            }
        }
        self.favorites
            .save(&to, &merged)
            .and_then(|()| self.favorites.save(&from, &[]))
            .map_err(|err| storage_failure(&err))?;
        info!(from = %from, to = %to, count = merged.len(), "favorites moved to new email");
        Ok(())
    }

    fn hydrate(&self, profile: UserProfile) -> UserProfile {
        UserProfile {
            favorites: self.favorites.load(&profile.id),
            ..profile
        }
    }
}

impl<P, F> SessionProvider for SessionService<P, F>
where
    P: ProfileRepository,
    F: FavoritesRepository,
{
    fn current_user(&self) -> Option<UserId> {
        self.profiles.load().map(|profile| profile.id)
    }
}

fn storage_failure(err: &PersistenceError) -> Error {
    warn!(error = %err, "failed to persist session");
    Error::service_unavailable(format!("local storage unavailable: {err}"))
}
