use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use super::{Geocoder, GeocodeResponse, NearbyResponse, PlaceSearch};
use crate::config::{MapsConfig, required};
use crate::models::GeoCoordinate;
use crate::{CareCompassError, Result};

/// Google Maps Geocoding + Places Nearby Search client
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    /// Create a new client; fails when no API key is configured
    pub fn new(config: &MapsConfig) -> Result<Self> {
        let api_key = required(&config.api_key, "maps.api_key")?.to_string();

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("CareCompass/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CareCompassError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response, api: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CareCompassError::api(format!(
                "{api} HTTP {status}: {error_text}"
            )));
        }

        response.json().await.map_err(|e| match CareCompassError::from(e) {
            CareCompassError::Parse { message } => {
                CareCompassError::parse(format!("Failed to parse {api} response: {message}"))
            }
            other => other,
        })
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse> {
        let response = self
            .client
            .get(self.endpoint("geocode/json"))
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let body: GeocodeResponse = Self::read_json(response, "Geocoding API").await?;

        if body.status.is_ok() {
            debug!("Geocoding returned {} candidate(s)", body.results.len());
        } else {
            warn!(
                status = %body.status,
                error_message = body.error_message.as_deref().unwrap_or_default(),
                "Geocoding did not succeed"
            );
        }
        Ok(body)
    }
}

#[async_trait]
impl PlaceSearch for GoogleMapsClient {
    #[instrument(skip(self, center), fields(center = %center.format_coordinates()))]
    async fn nearby(
        &self,
        center: &GeoCoordinate,
        radius_m: u32,
        keyword: &str,
    ) -> Result<NearbyResponse> {
        let location = center.as_query_param();
        let radius = radius_m.to_string();

        let response = self
            .client
            .get(self.endpoint("place/nearbysearch/json"))
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("keyword", keyword),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: NearbyResponse = Self::read_json(response, "Places API").await?;

        if body.status.is_ok() {
            info!("Found {} places within {}m", body.results.len(), radius_m);
        } else {
            warn!(
                status = %body.status,
                error_message = body.error_message.as_deref().unwrap_or_default(),
                "Nearby search did not succeed"
            );
        }
        Ok(body)
    }
}
