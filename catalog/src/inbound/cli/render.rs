//! Plain-text rendering of catalog entries, places and notices.

use std::io::{self, Write};

use serde_json::Value;

use crate::domain::ports::{NoticeLevel, PlaceCandidate};
use crate::domain::{CoffeeShopRecord, MAX_RATING, UserProfile};

pub(super) fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_RATING));
    let empty = usize::from(MAX_RATING) - filled;
    format!("{}{}", "*".repeat(filled), ".".repeat(empty))
}

pub(super) fn shop_line(record: &CoffeeShopRecord, favorite: bool) -> String {
    let marker = if favorite { "♥" } else { " " };
    let origin = if record.is_user_added { "yours" } else { "preset" };
    format!(
        "{marker} {id:>13}  {stars}  {name} ({location}) [{origin}, added {date}]",
        id = record.id,
        stars = stars(record.rating.get()),
        name = record.name,
        location = record.location,
        date = record.date_added.format("%Y-%m-%d"),
    )
}

pub(super) fn write_shops<'a>(
    out: &mut impl Write,
    records: impl IntoIterator<Item = &'a CoffeeShopRecord>,
    is_favorite: impl Fn(&CoffeeShopRecord) -> bool,
) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", shop_line(record, is_favorite(record)))?;
    }
    Ok(())
}

pub(super) fn write_places(out: &mut impl Write, places: &[PlaceCandidate]) -> io::Result<()> {
    if places.is_empty() {
        return writeln!(out, "No suggestions.");
    }
    for (index, place) in places.iter().enumerate() {
        writeln!(
            out,
            "{n}. {name} [{coordinates}]",
            n = index + 1,
            name = place.display_name,
            coordinates = place.coordinates,
        )?;
    }
    Ok(())
}

pub(super) fn write_profile(out: &mut impl Write, profile: &UserProfile) -> io::Result<()> {
    writeln!(out, "{} <{}>", profile.display_name(), profile.email)?;
    writeln!(out, "  id:        {}", profile.id)?;
    writeln!(out, "  member:    {}", profile.created_at.format("%Y-%m-%d"))?;
    if !profile.location.is_empty() {
        writeln!(out, "  location:  {}", profile.location)?;
    }
    if !profile.bio.is_empty() {
        writeln!(out, "  bio:       {}", profile.bio)?;
    }
    writeln!(out, "  favorites: {}", profile.favorites.len())
}

pub(super) fn write_notice(out: &mut impl Write, level: NoticeLevel, message: &str) -> io::Result<()> {
    writeln!(out, "[{level}] {message}")
}

/// Field messages carried in an error's `{"fields": {...}}` details.
pub(super) fn write_field_errors(out: &mut impl Write, details: &Value) -> io::Result<()> {
    let Some(fields) = details.get("fields").and_then(Value::as_object) else {
        return Ok(());
    };
    for (field, message) in fields {
        writeln!(out, "  {field}: {}", message.as_str().unwrap_or_default())?;
    }
    Ok(())
}
