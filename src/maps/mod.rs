//! Geocoding and nearby place search
//!
//! The two capabilities the care lookup depends on, expressed as traits so the
//! pipeline can run against Google Maps in production and in-memory fakes in
//! tests. Response types mirror the Google JSON payloads closely enough to
//! deserialize them directly.

pub mod google;

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;
use crate::models::GeoCoordinate;

pub use google::GoogleMapsClient;

/// Resolves free-text locations to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse>;
}

/// Searches a provider directory around a coordinate
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn nearby(
        &self,
        center: &GeoCoordinate,
        radius_m: u32,
        keyword: &str,
    ) -> Result<NearbyResponse>;
}

/// Status field carried by every Maps web service response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ApiStatus {
    Ok,
    ZeroResults,
    Other(String),
}

impl From<String> for ApiStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OK" => ApiStatus::Ok,
            "ZERO_RESULTS" => ApiStatus::ZeroResults,
            _ => ApiStatus::Other(value),
        }
    }
}

impl ApiStatus {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiStatus::Ok)
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiStatus::Ok => write!(f, "OK"),
            ApiStatus::ZeroResults => write!(f, "ZERO_RESULTS"),
            ApiStatus::Other(status) => write!(f, "{status}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeocodeResult> for GeoCoordinate {
    fn from(result: GeocodeResult) -> Self {
        GeoCoordinate::new(
            result.geometry.location.lat,
            result.geometry.location.lng,
            result.formatted_address,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One place from a nearby search; every field may be absent upstream
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResult {
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
}
