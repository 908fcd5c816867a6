//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **local**: repositories over the `local-store` JSON blob store, using
//!   the storage keys and shapes of the browser client.
//! - **nominatim**: reqwest-backed geocoding against a Nominatim endpoint.
//!
//! Adapters are thin translators between domain types and their stored or
//! transported representations. They contain no business logic.

pub mod local;
pub mod nominatim;
