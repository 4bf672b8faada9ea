//! Data models for `CareCompass`
//!
//! - Location: resolved coordinates and normalized address
//! - Provider: a nearby care provider ready for presentation

pub mod location;
pub mod provider;

pub use location::GeoCoordinate;
pub use provider::CareProvider;
