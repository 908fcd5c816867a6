//! Favorites index.
//!
//! Favorites are snapshots: toggling stores a copy of the shop as it looked
//! at that moment, and later edits to the shop do not flow into it. Each
//! mutation re-reads the user's list, applies the change and writes the
//! whole list back once.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    FavoritesRepository, NoticeLevel, Notifier, PersistenceError, SessionProvider,
};
use crate::domain::{CoffeeShopRecord, Error, ShopId, UserId};

const LOGIN_TO_FAVORITE: &str = "Please log in to save favorites";

/// Outcome of [`FavoritesService::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The shop was appended to the user's favorites.
    Added,
    /// The shop was removed from the user's favorites.
    Removed,
}

/// Per-user favorites over a [`FavoritesRepository`].
pub struct FavoritesService<F> {
    repo: Arc<F>,
    session: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl<F> Clone for FavoritesService<F> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            session: Arc::clone(&self.session),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<F: FavoritesRepository> FavoritesService<F> {
    /// Create a new service.
    pub const fn new(
        repo: Arc<F>,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repo,
            session,
            notifier,
        }
    }

    /// `user`'s favorites in insertion order, one entry per shop id.
    #[must_use]
    pub fn favorites(&self, user: &UserId) -> Vec<CoffeeShopRecord> {
        let mut seen = BTreeSet::new();
        let mut stored = self.repo.load(user);
        let before = stored.len();
        stored.retain(|shop| seen.insert(shop.id));
        if stored.len() != before {
            debug!(user = %user, dropped = before - stored.len(), "ignored duplicate favorites");
        }
        stored
    }

    /// Whether `user` has favorited `shop`.
    #[must_use]
    pub fn is_favorite(&self, user: &UserId, shop: ShopId) -> bool {
        self.repo.load(user).iter().any(|record| record.id == shop)
    }

    /// `user`'s favorites whose name, location or review contains `term`,
    /// ignoring case. A blank term returns every favorite.
    #[must_use]
    pub fn search(&self, user: &UserId, term: &str) -> Vec<CoffeeShopRecord> {
        let mut found = self.favorites(user);
        if !term.trim().is_empty() {
            let needle = term.to_lowercase();
            found.retain(|shop| shop.matches_text(&needle));
        }
        found
    }

    /// Add `record` to the signed-in user's favorites, or remove it when it
    /// is already there.
    ///
    /// # Errors
    ///
    /// - [`Error::unauthorized`] without a session; nothing is written.
    /// - [`Error::service_unavailable`] when the list cannot be persisted.
    pub fn toggle(&self, record: &CoffeeShopRecord) -> Result<FavoriteToggle, Error> {
        let Some(user) = self.session.current_user() else {
            warn!(shop_id = %record.id, "favorite toggle without a session");
            self.notifier.notify(NoticeLevel::Error, LOGIN_TO_FAVORITE);
            return Err(Error::unauthorized("saving favorites requires authentication"));
        };

        let mut favorites = self.favorites(&user);
        let outcome = if favorites.iter().any(|shop| shop.id == record.id) {
            favorites.retain(|shop| shop.id != record.id);
            FavoriteToggle::Removed
        } else {
            favorites.push(record.clone());
            FavoriteToggle::Added
        };

        self.repo
            .save(&user, &favorites)
            .map_err(|err| self.storage_failure(&err))?;

        info!(user = %user, shop_id = %record.id, ?outcome, "favorite toggled");
        let message = match outcome {
            FavoriteToggle::Added => format!("{} added to favorites", record.name),
            FavoriteToggle::Removed => format!("{} removed from favorites", record.name),
        };
        self.notifier.notify(NoticeLevel::Success, &message);
        Ok(outcome)
    }

    /// Drop a deleted shop from the signed-in user's favorites.
    ///
    /// Returns whether anything was removed. Without a session there is
    /// nothing to purge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::service_unavailable`] when the list cannot be
    /// persisted.
    pub fn purge(&self, shop: ShopId) -> Result<bool, Error> {
        let Some(user) = self.session.current_user() else {
            return Ok(false);
        };
        let mut favorites = self.favorites(&user);
        let before = favorites.len();
        favorites.retain(|record| record.id != shop);
        if favorites.len() == before {
            return Ok(false);
        }

        self.repo
            .save(&user, &favorites)
            .map_err(|err| self.storage_failure(&err))?;
        info!(user = %user, shop_id = %shop, "deleted shop purged from favorites");
        Ok(true)
    }

    fn storage_failure(&self, err: &PersistenceError) -> Error {
        warn!(error = %err, "failed to persist favorites");
        self.notifier
            .notify(NoticeLevel::Error, "Failed to update favorites. Please try again.");
        Error::service_unavailable(format!("local storage unavailable: {err}"))
    }
}
