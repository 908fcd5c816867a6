//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod favorites_repository;
mod geocoder;
mod notifier;
mod persistence_error;
mod profile_repository;
mod session;
mod shop_repository;

#[cfg(test)]
pub use favorites_repository::MockFavoritesRepository;
pub use favorites_repository::{FavoritesRepository, FixtureFavoritesRepository};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, Geocoder, GeocoderError, PlaceCandidate};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{NoticeLevel, Notifier, RecordingNotifier};
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository};
#[cfg(test)]
pub use session::MockSessionProvider;
pub use session::{FixtureSession, SessionProvider};
#[cfg(test)]
pub use shop_repository::MockShopRepository;
pub use shop_repository::{FixtureShopRepository, ShopRepository};
