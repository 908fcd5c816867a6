//! Service wiring and command handlers for the CLI.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use local_store::BlobStore;
use mockable::Clock;
use tracing::debug;

use super::render::{
    shop_line, write_field_errors, write_notice, write_places, write_profile, write_shops,
};
use super::{AddArgs, Command, EditArgs, ListArgs, NearbyArgs, ProfileArgs, SignInArgs};
use crate::domain::ports::{Geocoder, Notifier, RecordingNotifier, SessionProvider};
use crate::domain::{
    AuthMode, CatalogFilter, CatalogService, Coordinates, Error,
    FavoritesService, FilterSortState, FlatFilter, LocationSearch, ProfileChanges,
    ProximityMatcher, SessionService, ShopChanges, ShopDraft, ShopId, SignInRequest, UserId,
};
use crate::outbound::local::{LocalFavoritesRepository, LocalProfileRepository, LocalShopRepository};

type Session<B> = SessionService<LocalProfileRepository<B>, LocalFavoritesRepository<B>>;

/// Every service the CLI drives, wired over one blob store.
pub struct App<B, G> {
    session: Arc<Session<B>>,
    catalog: CatalogService<LocalShopRepository<B>>,
    favorites: FavoritesService<LocalFavoritesRepository<B>>,
    search: LocationSearch<G>,
    matcher: ProximityMatcher,
    notices: Arc<RecordingNotifier>,
}

impl<B, G> App<B, G>
where
    B: BlobStore + Clone + 'static,
    G: Geocoder,
{
    /// Wire the services over `backend` and `geocoder`.
    pub fn new(
        backend: &B,
        geocoder: G,
        clock: Arc<dyn Clock>,
        matcher: ProximityMatcher,
        max_user_shops: usize,
    ) -> Self {
        let notices = Arc::new(RecordingNotifier::default());
        let notifier: Arc<dyn Notifier> = Arc::clone(&notices) as Arc<dyn Notifier>;
        let favorites_repo = Arc::new(LocalFavoritesRepository::new(backend.clone()));
        let session = Arc::new(SessionService::new(
            Arc::new(LocalProfileRepository::new(backend.clone())),
            Arc::clone(&favorites_repo),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ));
        let provider: Arc<dyn SessionProvider> = Arc::clone(&session) as Arc<dyn SessionProvider>;
        let catalog = CatalogService::new(
            Arc::new(LocalShopRepository::new(backend.clone())),
            Arc::clone(&provider),
            Arc::clone(&notifier),
            clock,
        )
        .with_max_user_shops(max_user_shops);
        let favorites = FavoritesService::new(favorites_repo, provider, Arc::clone(&notifier));
        let search = LocationSearch::new(Arc::new(geocoder), notifier);

        Self {
            session,
            catalog,
            favorites,
            search,
            matcher,
            notices,
        }
    }

    /// Run `command`, writing its output and then any notices to `out`.
    ///
    /// # Errors
    ///
    /// Returns the domain error or I/O failure that stopped the command.
    /// Field-level validation messages are written to `out` first.
    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        debug!("executing command");
        let outcome = self.dispatch(command, out).await;
        for (level, message) in self.notices.take() {
            write_notice(out, level, &message)?;
        }
        let details = outcome
            .as_ref()
            .err()
            .and_then(|report| report.downcast_ref::<Error>())
            .and_then(Error::details);
        if let Some(fields) = details {
            write_field_errors(out, fields)?;
        }
        outcome
    }

    async fn dispatch(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::List(args) => self.list(args, out),
            Command::Add(args) => self.add(args, out).await,
            Command::Remove { id } => self.remove(ShopId::new(id), out),
            Command::Edit(args) => self.edit(args, out),
            Command::Favorite { id } => self.toggle_favorite(ShopId::new(id), out),
            Command::Favorites { search } => self.list_favorites(&search, out),
            Command::Markers => self.markers(out),
            Command::Nearby(args) => self.nearby(args, out).await,
            Command::Geocode { query } => {
                let places = self.search.suggest(&query).await.into_suggestions();
                write_places(out, &places)?;
                Ok(())
            }
            Command::SignIn(args) => self.sign_in(args, out),
            Command::SignOut => {
                self.session.sign_out()?;
                Ok(())
            }
            Command::Profile(args) => self.profile(args, out),
        }
    }

    fn list(&self, args: ListArgs, out: &mut impl Write) -> Result<()> {
        let filter = CatalogFilter::try_from(FlatFilter {
            rating: args.rating,
            date_range: args.date_range,
            name_range: args.name_range,
        })?;
        let state = FilterSortState::sorted_by(args.sort).with_filter(filter);
        let result = self.catalog.query(&args.search, state);

        writeln!(out, "{}", result.summary())?;
        let favorites = self.favorite_ids();
        write_shops(out, &result.shops, |record| favorites.contains(&record.id))?;
        Ok(())
    }

    async fn add(&mut self, args: AddArgs, out: &mut impl Write) -> Result<()> {
        let (location, coordinates) = match args.coordinates {
            Some(coordinates) => (args.location, Some(coordinates)),
            None => self.resolve_location(args.location, args.pick).await,
        };
        let draft = ShopDraft {
            name: args.name,
            location,
            rating: args.rating,
            review: args.review,
            image: args.image,
            coordinates,
        };
        let added = self.catalog.add(&draft)?;
        writeln!(out, "Added {} with id {}", added.name, added.id)?;
        Ok(())
    }

    /// The `pick`-th suggestion for `text`, or the raw text without a
    /// position when nothing matched.
    async fn resolve_location(
        &self,
        text: String,
        pick: NonZeroUsize,
    ) -> (String, Option<Coordinates>) {
        let suggestions = self.search.suggest(&text).await.into_suggestions();
        match suggestions.into_iter().nth(pick.get().saturating_sub(1)) {
            Some(place) => (place.display_name, Some(place.coordinates)),
            None => (text, None),
        }
    }

    fn remove(&mut self, id: ShopId, out: &mut impl Write) -> Result<()> {
        if self.catalog.remove(id)? {
            self.favorites.purge(id)?;
            writeln!(out, "Removed {id}")?;
        } else {
            writeln!(out, "Nothing removed")?;
        }
        Ok(())
    }

    fn edit(&mut self, args: EditArgs, out: &mut impl Write) -> Result<()> {
        let changes = ShopChanges {
            name: args.name,
            location: args.location,
            rating: args.rating,
            review: args.review,
            image: args.image,
            coordinates: args.coordinates,
        };
        if changes.is_empty() {
            return Err(eyre!("nothing to change; pass at least one field"));
        }
        let updated = self.catalog.update(ShopId::new(args.id), &changes)?;
        writeln!(out, "{}", shop_line(&updated, false))?;
        Ok(())
    }

    fn toggle_favorite(&self, id: ShopId, out: &mut impl Write) -> Result<()> {
        let record = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no coffee shop with id {id}")))?;
        let outcome = self.favorites.toggle(&record)?;
        writeln!(out, "{}: {outcome:?}", record.name)?;
        Ok(())
    }

    fn list_favorites(&self, term: &str, out: &mut impl Write) -> Result<()> {
        let user = self.require_user()?;
        let found = self.favorites.search(&user, term);
        writeln!(out, "{} favorite(s)", found.len())?;
        write_shops(out, &found, |_| true)?;
        Ok(())
    }

    fn markers(&self, out: &mut impl Write) -> Result<()> {
        for record in self.catalog.markers() {
            if let Some(position) = record.coordinates {
                writeln!(out, "{} [{position}] {}", record.id, record.name)?;
            }
        }
        Ok(())
    }

    async fn nearby(&self, args: NearbyArgs, out: &mut impl Write) -> Result<()> {
        let centre = Coordinates::new(args.longitude, args.latitude)
            .wrap_err("invalid map centre")?;
        let place = self
            .search
            .describe(centre)
            .await
            .unwrap_or_else(|| centre.to_string());
        writeln!(out, "Map centre: {place}")?;

        let favorites = self.favorite_ids();
        let user_shops = self.catalog.user_shops();
        match args.search {
            Some(term) => {
                let mut visible = self.catalog.query(&term, FilterSortState::default()).shops;
                let added = self.matcher.merge_nearby(centre, user_shops, &mut visible);
                writeln!(out, "{} shown, {added} added from the map", visible.len())?;
                write_shops(out, &visible, |record| favorites.contains(&record.id))?;
            }
            None => {
                let near = self.matcher.nearby(centre, user_shops);
                writeln!(out, "{} nearby", near.len())?;
                write_shops(out, near, |record| favorites.contains(&record.id))?;
            }
        }
        Ok(())
    }

    fn sign_in(&self, args: SignInArgs, out: &mut impl Write) -> Result<()> {
        let request = SignInRequest {
            mode: if args.signup {
                AuthMode::Signup
            } else {
                AuthMode::Login
            },
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            first_name: args.first_name,
            last_name: args.last_name,
        };
        let profile = self.session.sign_in(&request)?;
        write_profile(out, &profile)?;
        Ok(())
    }

    fn profile(&self, args: ProfileArgs, out: &mut impl Write) -> Result<()> {
        let changes = ProfileChanges {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            bio: args.bio,
            location: args.location,
        };
        let profile = if changes == ProfileChanges::default() {
            self.session
                .current_profile()
                .ok_or_else(|| Error::unauthorized("viewing a profile requires authentication"))?
        } else {
            self.session.update_profile(changes)?
        };
        write_profile(out, &profile)?;
        Ok(())
    }

    fn require_user(&self) -> Result<UserId, Error> {
        self.session
            .current_user()
            .ok_or_else(|| Error::unauthorized("listing favorites requires authentication"))
    }

    fn favorite_ids(&self) -> Vec<ShopId> {
        self.session
            .current_user()
            .map(|user| {
                self.favorites
                    .favorites(&user)
                    .iter()
                    .map(|record| record.id)
                    .collect()
            })
            .unwrap_or_default()
    }
}
