//! Driving adapters that feed user intent into the domain services.

pub mod cli;
