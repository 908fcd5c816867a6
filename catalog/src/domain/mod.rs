//! Domain primitives, services and ports.
//!
//! Purpose: model the coffee-shop catalog independently of storage and
//! transport. Services receive their collaborators as ports so adapters
//! (local files, Nominatim, the CLI) stay at the edges.
//!
//! Public surface:
//! - [`CatalogService`]: preset plus user-added shops, with search, filter
//!   and sort.
//! - [`FavoritesService`]: per-user favorite snapshots.
//! - [`SessionService`]: local sign-in and the current-user capability.
//! - [`ProximityMatcher`]: map-centre association for placed shops.
//! - [`LocationSearch`]: latest-wins geocoded suggestions.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.

pub mod error;
pub mod ports;

mod catalog_service;
mod favorites_service;
mod filter;
mod location_search;
mod presets;
mod proximity;
mod query;
mod session_service;
mod shop;
mod user;
mod validation;

pub use self::catalog_service::{CatalogService, DEFAULT_MAX_USER_SHOPS};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::favorites_service::{FavoriteToggle, FavoritesService};
pub use self::filter::{
    ALL, CatalogFilter, DateWindow, FilterSelectionError, FilterSortState, FlatFilter, NameBand,
    ParseSelectorError, SortKey,
};
pub use self::location_search::{LocationSearch, MAX_SUGGESTIONS, MIN_QUERY_CHARS, SearchOutcome};
pub use self::presets::preset_shops;
pub use self::proximity::{DEFAULT_PROXIMITY_THRESHOLD, InvalidThreshold, ProximityMatcher};
pub use self::query::{QueryResult, run_query, sort_records};
pub use self::session_service::SessionService;
pub use self::shop::{
    CoffeeShopRecord, Coordinates, CoordinatesError, MAX_RATING, Rating, RatingOutOfRange, ShopId,
};
pub use self::user::{AuthMode, PASSWORD_MIN, ProfileChanges, SignInRequest, UserId, UserProfile};
pub use self::validation::{
    FIELD_IMAGE, FIELD_LOCATION, FIELD_NAME, FIELD_RATING, FIELD_REVIEW, FieldErrors,
    ShopChanges, ShopDraft, ValidShop,
};
