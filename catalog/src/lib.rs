//! Coffee-shop catalog: browsing, submissions, favorites and a local session.
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] holds records, validation, the query pipeline and services,
//!   plus the ports they depend on.
//! - [`outbound`] implements those ports over local blob storage, Nominatim
//!   and tracing.
//! - [`inbound`] drives the services from the command line.
//! - [`config`] resolves settings from the environment and config files.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
