//! Nearby care lookup
//!
//! Resolves a free-text location to coordinates, searches for mental-health
//! providers around it and renders the result. Every path ends in text a user
//! can read; national crisis resources are attached whenever a location was
//! understood.

pub mod outcome;
pub mod resolver;

pub use outcome::{CareOutcome, NATIONAL_RESOURCES};
pub use resolver::{CareSearchSettings, NearbyCareResolver};
