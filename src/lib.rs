//! `CareCompass` - decision-layer tools for a mental-health support assistant
//!
//! Three independent, stateless tools meant to be invoked by an agent:
//! - [`ResponseGenerator`]: empathic reply from a persona-prompted chat model
//! - [`EmergencyDialer`]: one outbound call to a fixed emergency contact
//! - [`NearbyCareResolver`]: nearby therapists for a free-text location, with
//!   national crisis resources as the fallback

pub mod api;
pub mod care;
pub mod config;
pub mod error;
pub mod llm;
pub mod maps;
pub mod models;
pub mod responder;
pub mod telemetry;
pub mod telephony;
pub mod web;

// Re-export core types for public API
pub use care::{CareOutcome, CareSearchSettings, NearbyCareResolver};
pub use config::CareCompassConfig;
pub use error::CareCompassError;
pub use models::{CareProvider, GeoCoordinate};
pub use responder::{FALLBACK_REPLY, ResponseGenerator};
pub use telephony::{CallReceipt, EmergencyDialer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CareCompassError>;
