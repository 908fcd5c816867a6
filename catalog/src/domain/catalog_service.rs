//! Catalog store service.
//!
//! Holds the preset and user-added shops in memory, answers queries over
//! their union, and persists the user-added slice through a
//! [`ShopRepository`] on every mutation. State is only committed after the
//! repository accepts the write, so a failed save leaves the catalog as it
//! was.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{NoticeLevel, Notifier, PersistenceError, SessionProvider, ShopRepository};
use crate::domain::{
    CoffeeShopRecord, Error, FilterSortState, QueryResult, ShopChanges, ShopDraft, ShopId,
    ValidShop, preset_shops, run_query,
};

/// Default ceiling on user-added shops.
pub const DEFAULT_MAX_USER_SHOPS: usize = 500;

const LOGIN_TO_ADD: &str = "Please log in to add coffee shops";
const LOGIN_TO_CHANGE: &str = "Please log in to manage coffee shops";
const FIX_FORM: &str = "Please fix the errors in the form";

/// Catalog store over presets plus user submissions.
pub struct CatalogService<R> {
    repo: Arc<R>,
    session: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    presets: Vec<CoffeeShopRecord>,
    user_shops: Vec<CoffeeShopRecord>,
    max_user_shops: usize,
}

impl<R: ShopRepository> CatalogService<R> {
    /// Load user-added shops from `repo` and combine them with the presets.
    ///
    /// Stored shops whose id collides with a preset or an earlier stored
    /// shop are dropped with a warning.
    pub fn new(
        repo: Arc<R>,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presets = preset_shops();
        let mut seen: BTreeSet<ShopId> = presets.iter().map(|shop| shop.id).collect();
        let user_shops: Vec<CoffeeShopRecord> = repo
            .load()
            .into_iter()
            .filter(|shop| {
                let fresh = seen.insert(shop.id);
                if !fresh {
                    warn!(shop_id = %shop.id, "dropping stored shop with duplicate id");
                }
                fresh
            })
            .map(|shop| CoffeeShopRecord {
                is_user_added: true,
                ..shop
            })
            .collect();
        debug!(
            presets = presets.len(),
            user_shops = user_shops.len(),
            "catalog loaded"
        );

        Self {
            repo,
            session,
            notifier,
            clock,
            presets,
            user_shops,
            max_user_shops: DEFAULT_MAX_USER_SHOPS,
        }
    }

    /// Replace the user-added ceiling. Existing shops above it are kept.
    #[must_use]
    pub const fn with_max_user_shops(mut self, limit: usize) -> Self {
        self.max_user_shops = limit;
        self
    }

    /// Every shop, user-added (newest first) followed by presets.
    pub fn shops(&self) -> impl Iterator<Item = &CoffeeShopRecord> {
        self.user_shops.iter().chain(self.presets.iter())
    }

    /// The user-added slice, newest first.
    #[must_use]
    pub fn user_shops(&self) -> &[CoffeeShopRecord] {
        &self.user_shops
    }

    /// Total number of shops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.user_shops.len() + self.presets.len()
    }

    /// Whether the catalog is empty. Presets make this false in practice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a shop by id.
    #[must_use]
    pub fn get(&self, id: ShopId) -> Option<&CoffeeShopRecord> {
        self.shops().find(|shop| shop.id == id)
    }

    /// User-added shops that can be placed on a map.
    pub fn markers(&self) -> impl Iterator<Item = &CoffeeShopRecord> {
        self.user_shops
            .iter()
            .filter(|shop| shop.coordinates.is_some())
    }

    /// Search, filter and sort the catalog. Never mutates.
    #[must_use]
    pub fn query(&self, term: &str, state: FilterSortState) -> QueryResult {
        let result = run_query(self.shops(), term, state, self.clock.utc());
        debug!(
            term,
            sort = %state.sort,
            filtered = result.filtered(),
            total = result.total,
            "catalog queried"
        );
        result
    }

    /// Validate and store a new user submission.
    ///
    /// # Errors
    ///
    /// - [`Error::unauthorized`] without a session.
    /// - [`Error::invalid_request`] with field details when validation fails.
    /// - [`Error::conflict`] when the user-added ceiling is reached.
    /// - [`Error::service_unavailable`] when the list cannot be persisted.
    pub fn add(&mut self, draft: &ShopDraft) -> Result<CoffeeShopRecord, Error> {
        self.require_session(LOGIN_TO_ADD, "adding a coffee shop")?;
        let valid = self.validate(draft)?;

        if self.user_shops.len() >= self.max_user_shops {
            warn!(limit = self.max_user_shops, "catalog full; rejecting add");
            self.notifier.notify(
                NoticeLevel::Warning,
                &format!("You can add at most {} coffee shops", self.max_user_shops),
            );
            return Err(Error::conflict("user-added coffee shop limit reached")
                .with_details(json!({ "limit": self.max_user_shops })));
        }

        let now = self.clock.utc();
        let record = CoffeeShopRecord {
            id: self.next_id(now),
            name: valid.name,
            location: valid.location,
            rating: valid.rating,
            review: valid.review,
            image: valid.image.map(String::from),
            date_added: self.next_date(now),
            coordinates: Some(valid.coordinates),
            is_user_added: true,
        };

        let mut next = Vec::with_capacity(self.user_shops.len() + 1);
        next.push(record.clone());
        next.extend(self.user_shops.iter().cloned());
        self.persist(next, "Failed to add coffee shop. Please try again.")?;

        info!(shop_id = %record.id, name = %record.name, "coffee shop added");
        self.notifier.notify(
            NoticeLevel::Success,
            &format!("{} added successfully!", record.name),
        );
        Ok(record)
    }

    /// Apply `changes` to a user-added shop.
    ///
    /// Identity, creation time and (unless replaced) coordinates are kept.
    ///
    /// # Errors
    ///
    /// - [`Error::unauthorized`] without a session.
    /// - [`Error::not_found`] for an unknown id.
    /// - [`Error::invalid_request`] for presets or when the merged record
    ///   fails validation.
    /// - [`Error::service_unavailable`] when the list cannot be persisted.
    pub fn update(&mut self, id: ShopId, changes: &ShopChanges) -> Result<CoffeeShopRecord, Error> {
        self.require_session(LOGIN_TO_CHANGE, "editing a coffee shop")?;

        let Some(current) = self.user_shops.iter().find(|shop| shop.id == id) else {
            return Err(self.missing_or_preset(id, "edited"));
        };
        let valid = self.validate(&changes.merge_into(current))?;

        let updated = CoffeeShopRecord {
            id: current.id,
            name: valid.name,
            location: valid.location,
            rating: valid.rating,
            review: valid.review,
            image: valid.image.map(String::from),
            date_added: current.date_added,
            coordinates: Some(valid.coordinates),
            is_user_added: true,
        };

        let next: Vec<CoffeeShopRecord> = self
            .user_shops
            .iter()
            .map(|shop| if shop.id == id { updated.clone() } else { shop.clone() })
            .collect();
        self.persist(next, "Failed to update coffee shop. Please try again.")?;

        info!(shop_id = %updated.id, "coffee shop updated");
        self.notifier.notify(
            NoticeLevel::Success,
            &format!("{} updated successfully!", updated.name),
        );
        Ok(updated)
    }

    /// Delete a user-added shop.
    ///
    /// Returns `false` without touching storage for unknown ids and for
    /// presets. Callers purge the shop from favorites separately.
    ///
    /// # Errors
    ///
    /// - [`Error::unauthorized`] without a session.
    /// - [`Error::service_unavailable`] when the list cannot be persisted.
    pub fn remove(&mut self, id: ShopId) -> Result<bool, Error> {
        self.require_session(LOGIN_TO_CHANGE, "deleting a coffee shop")?;

        if self.presets.iter().any(|shop| shop.id == id) {
            warn!(shop_id = %id, "refusing to delete preset coffee shop");
            self.notifier
                .notify(NoticeLevel::Warning, "Preset coffee shops cannot be deleted");
            return Ok(false);
        }
        let Some(removed) = self.user_shops.iter().find(|shop| shop.id == id).cloned() else {
            debug!(shop_id = %id, "delete of unknown coffee shop ignored");
            return Ok(false);
        };

        let next: Vec<CoffeeShopRecord> = self
            .user_shops
            .iter()
            .filter(|shop| shop.id != id)
            .cloned()
            .collect();
        self.persist(next, "Failed to delete coffee shop. Please try again.")?;

        info!(shop_id = %id, "coffee shop deleted");
        self.notifier.notify(
            NoticeLevel::Success,
            &format!("{} deleted", removed.name),
        );
        Ok(true)
    }

    fn require_session(&self, notice: &str, action: &str) -> Result<(), Error> {
        if self.session.current_user().is_some() {
            return Ok(());
        }
        warn!(action, "rejected mutation without a session");
        self.notifier.notify(NoticeLevel::Error, notice);
        Err(Error::unauthorized(format!("{action} requires authentication")))
    }

    fn validate(&self, draft: &ShopDraft) -> Result<ValidShop, Error> {
        draft.validate().map_err(|errors| {
            debug!(fields = errors.len(), "shop draft rejected");
            self.notifier.notify(NoticeLevel::Warning, FIX_FORM);
            Error::invalid_request(FIX_FORM).with_details(errors.to_details())
        })
    }

    fn missing_or_preset(&self, id: ShopId, verb: &str) -> Error {
        if self.presets.iter().any(|shop| shop.id == id) {
            self.notifier.notify(
                NoticeLevel::Warning,
                &format!("Preset coffee shops cannot be {verb}"),
            );
            Error::invalid_request(format!("preset coffee shops cannot be {verb}"))
                .with_details(json!({ "id": id.get() }))
        } else {
            Error::not_found(format!("coffee shop {id} not found"))
        }
    }

    fn persist(&mut self, next: Vec<CoffeeShopRecord>, notice: &str) -> Result<(), Error> {
        match self.repo.save(&next) {
            Ok(()) => {
                self.user_shops = next;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to persist user-added coffee shops");
                self.notifier.notify(NoticeLevel::Error, notice);
                Err(map_persistence_error(&err))
            }
        }
    }

    /// Millisecond timestamp, bumped past every existing id.
    fn next_id(&self, now: DateTime<Utc>) -> ShopId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let floor = self
            .shops()
            .map(|shop| shop.id.get())
            .max()
            .map_or(0, |max| max.saturating_add(1));
        ShopId::new(millis.max(floor))
    }

    /// `now`, unless the clock ran backwards past the newest submission.
    fn next_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.user_shops
            .first()
            .map_or(now, |newest| now.max(newest.date_added))
    }
}

fn map_persistence_error(error: &PersistenceError) -> Error {
    let detail = match error {
        PersistenceError::Write { message, .. } | PersistenceError::Remove { message, .. } => {
            message
        }
    };
    Error::service_unavailable(format!("local storage unavailable: {detail}"))
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
