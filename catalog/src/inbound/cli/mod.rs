//! Command-line driving adapter.
//!
//! Each subcommand maps to one user action of the browsing client: query the
//! catalog, submit or edit a shop, toggle a favorite, move the map, or manage
//! the local session. Notices raised while handling a command are printed
//! after its output.

mod app;
mod render;

use std::num::NonZeroUsize;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Coordinates, SortKey};

pub use app::App;

/// `brewsky` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "brewsky",
    about = "Browse, review and favorite coffee shops",
    version
)]
pub struct Cli {
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported actions.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List shops matching a search, filter and sort.
    List(ListArgs),
    /// Submit a new shop; the location is resolved through the geocoder.
    Add(AddArgs),
    /// Delete a user-added shop.
    Remove {
        /// Shop identifier.
        id: u64,
    },
    /// Edit a user-added shop.
    Edit(EditArgs),
    /// Add a shop to, or remove it from, your favorites.
    Favorite {
        /// Shop identifier.
        id: u64,
    },
    /// List your favorites.
    Favorites {
        /// Only show favorites whose text contains this term.
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List user-added shops placed on the map.
    Markers,
    /// Move the map centre and show user-added shops close to it.
    Nearby(NearbyArgs),
    /// Look up location suggestions.
    Geocode {
        /// Free-text place query.
        query: String,
    },
    /// Sign in, or sign up with `--signup`.
    SignIn(SignInArgs),
    /// Sign out of the local session.
    SignOut,
    /// Show the signed-in profile, or update it when any field is given.
    Profile(ProfileArgs),
}

/// Arguments for `list`.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against name, location and review.
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Sort order: `date`, `rating` or `name`.
    #[arg(long, default_value_t = SortKey::Date)]
    pub sort: SortKey,
    /// Minimum rating, 1 to 5; 0 disables the filter.
    #[arg(long, default_value_t = 0)]
    pub rating: u8,
    /// Date window: `all`, `week`, `month` or `year`.
    #[arg(long, default_value = "all")]
    pub date_range: String,
    /// Name band: `all`, `a-g`, `h-n`, `o-s` or `t-z`.
    #[arg(long, default_value = "all")]
    pub name_range: String,
}

/// Arguments for `add`.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Shop name.
    #[arg(long)]
    pub name: String,
    /// Location text; geocoded unless `--coordinates` is given.
    #[arg(long)]
    pub location: String,
    /// Star rating, 1 to 5.
    #[arg(long)]
    pub rating: u8,
    /// Review text.
    #[arg(long)]
    pub review: String,
    /// Optional http(s) image URL.
    #[arg(long)]
    pub image: Option<String>,
    /// Explicit `longitude,latitude`, skipping the geocoder.
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    pub coordinates: Option<Coordinates>,
    /// Which geocoder suggestion to use, counting from 1.
    #[arg(long, default_value_t = NonZeroUsize::MIN)]
    pub pick: NonZeroUsize,
}

/// Arguments for `edit`.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Shop identifier.
    pub id: u64,
    /// Replacement name.
    #[arg(long)]
    pub name: Option<String>,
    /// Replacement location text.
    #[arg(long)]
    pub location: Option<String>,
    /// Replacement rating.
    #[arg(long)]
    pub rating: Option<u8>,
    /// Replacement review.
    #[arg(long)]
    pub review: Option<String>,
    /// Replacement image URL; an empty value clears it.
    #[arg(long)]
    pub image: Option<String>,
    /// Replacement `longitude,latitude`.
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    pub coordinates: Option<Coordinates>,
}

/// Arguments for `nearby`.
#[derive(Debug, Clone, Args)]
pub struct NearbyArgs {
    /// Map centre longitude.
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: f64,
    /// Map centre latitude.
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: f64,
    /// Merge nearby shops into the results of this search.
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Arguments for `sign-in`.
#[derive(Debug, Clone, Args)]
pub struct SignInArgs {
    /// Email address.
    #[arg(long)]
    pub email: String,
    /// Password, at least six characters.
    #[arg(long)]
    pub password: String,
    /// Create the account instead of logging in.
    #[arg(long)]
    pub signup: bool,
    /// Repeated password (signup).
    #[arg(long, default_value = "")]
    pub confirm_password: String,
    /// Given name (signup).
    #[arg(long, default_value = "")]
    pub first_name: String,
    /// Family name (signup).
    #[arg(long, default_value = "")]
    pub last_name: String,
}

/// Arguments for `profile`.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    /// Replacement given name.
    #[arg(long)]
    pub first_name: Option<String>,
    /// Replacement family name.
    #[arg(long)]
    pub last_name: Option<String>,
    /// Replacement email; favorites follow the account to the new address.
    #[arg(long)]
    pub email: Option<String>,
    /// Replacement biography.
    #[arg(long)]
    pub bio: Option<String>,
    /// Replacement home location.
    #[arg(long)]
    pub location: Option<String>,
}

fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (lon, lat) = raw
        .split_once(',')
        .ok_or_else(|| "coordinates must be 'longitude,latitude'".to_owned())?;
    let longitude = f64::from_str(lon.trim())
        .map_err(|error| format!("failed to parse longitude: {error}"))?;
    let latitude = f64::from_str(lat.trim())
        .map_err(|error| format!("failed to parse latitude: {error}"))?;
    Coordinates::new(longitude, latitude).map_err(|error| error.to_string())
}
