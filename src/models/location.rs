//! Resolved location model

use serde::{Deserialize, Serialize};

/// A geocoded point with the address string the geocoder normalized it to.
/// Lives only for the duration of one lookup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeoCoordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Normalized address returned by the geocoder
    pub formatted_address: String,
}

impl GeoCoordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, formatted_address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            formatted_address: formatted_address.into(),
        }
    }

    /// `lat,lng` pair as expected by place search query strings
    #[must_use]
    pub fn as_query_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
