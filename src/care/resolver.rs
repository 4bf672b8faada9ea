//! Location-resolution-and-fallback pipeline
//!
//! Three stages, each allowed to fail on its own:
//! 1. geocode the query and keep the first (best ranked) match
//! 2. search for providers around it with a fixed radius and keyword set
//! 3. keep the first `max_results` places in upstream order
//!
//! Errors never leave [`NearbyCareResolver::find_nearby`]; they are folded
//! into a [`CareOutcome`].

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::CareOutcome;
use crate::Result;
use crate::config::MapsConfig;
use crate::maps::{Geocoder, GoogleMapsClient, PlaceSearch};
use crate::models::{CareProvider, GeoCoordinate};

/// Search parameters applied to every lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CareSearchSettings {
    pub radius_m: u32,
    pub keyword: String,
    pub max_results: usize,
}

impl Default for CareSearchSettings {
    fn default() -> Self {
        Self::from(&MapsConfig::default())
    }
}

impl From<&MapsConfig> for CareSearchSettings {
    fn from(config: &MapsConfig) -> Self {
        Self {
            radius_m: config.search_radius_m,
            keyword: config.keyword.clone(),
            max_results: config.max_results,
        }
    }
}

/// Finds mental-health providers near a free-text location
pub struct NearbyCareResolver {
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlaceSearch>,
    settings: CareSearchSettings,
}

impl NearbyCareResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlaceSearch>,
        settings: CareSearchSettings,
    ) -> Self {
        Self {
            geocoder,
            places,
            settings,
        }
    }

    /// Build a resolver backed by Google Maps for both stages
    pub fn from_config(config: &MapsConfig) -> Result<Self> {
        let client = Arc::new(GoogleMapsClient::new(config)?);
        Ok(Self::new(client.clone(), client, CareSearchSettings::from(config)))
    }

    #[must_use]
    pub fn settings(&self) -> &CareSearchSettings {
        &self.settings
    }

    /// Run the full lookup. Always yields a displayable outcome.
    #[instrument(skip(self))]
    pub async fn find_nearby(&self, location: &str) -> CareOutcome {
        let outcome = match self.lookup(location).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_timeout() => {
                warn!("Care lookup timed out: {}", e);
                CareOutcome::TimedOut
            }
            Err(e) => {
                error!("Care lookup failed: {}", e);
                CareOutcome::Failed {
                    detail: e.to_string(),
                }
            }
        };

        info!(outcome = outcome.kind(), "Care lookup finished");
        outcome
    }

    async fn lookup(&self, location: &str) -> Result<CareOutcome> {
        let Some(center) = self.resolve_location(location).await? else {
            return Ok(CareOutcome::LocationUnresolved {
                query: location.to_string(),
            });
        };

        let providers = self.search_providers(&center).await?;
        if providers.is_empty() {
            return Ok(CareOutcome::NoProvidersFound {
                address: center.formatted_address,
            });
        }

        Ok(CareOutcome::Providers {
            address: center.formatted_address,
            providers,
        })
    }

    /// Stage 1. `None` means the location was not understood.
    async fn resolve_location(&self, location: &str) -> Result<Option<GeoCoordinate>> {
        let query = location.trim();
        if query.is_empty() {
            debug!("Empty location, skipping geocoding");
            return Ok(None);
        }

        let response = self.geocoder.geocode(query).await?;
        if !response.status.is_ok() {
            debug!(status = %response.status, "Location not resolved");
            return Ok(None);
        }

        let candidates = response.results.len();
        let Some(best) = response.results.into_iter().next() else {
            return Ok(None);
        };
        if candidates > 1 {
            // No disambiguation: the first match wins
            debug!("{} geocoding candidates, using the first", candidates);
        }

        let center = GeoCoordinate::from(best);
        debug!(
            "Resolved '{}' to {} ({})",
            query,
            center.formatted_address,
            center.format_coordinates()
        );
        Ok(Some(center))
    }

    /// Stages 2 and 3. An unsuccessful search degrades to an empty list.
    async fn search_providers(&self, center: &GeoCoordinate) -> Result<Vec<CareProvider>> {
        let response = self
            .places
            .nearby(center, self.settings.radius_m, &self.settings.keyword)
            .await?;

        if !response.status.is_ok() {
            warn!(status = %response.status, "Nearby search unsuccessful, falling back to national resources");
            return Ok(Vec::new());
        }

        Ok(response
            .results
            .into_iter()
            .take(self.settings.max_results)
            .map(CareProvider::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CareCompassError;
    use crate::maps::{
        ApiStatus, GeocodeResponse, GeocodeResult, Geometry, LatLng, NearbyResponse, PlaceResult,
    };
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum GeocodeBehavior {
        Found(Vec<(&'static str, f64, f64)>),
        Status(&'static str),
        TimeOut,
        Fail,
    }

    struct FakeGeocoder {
        behavior: GeocodeBehavior,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn new(behavior: GeocodeBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, _address: &str) -> Result<GeocodeResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                GeocodeBehavior::Found(matches) => Ok(GeocodeResponse {
                    status: ApiStatus::Ok,
                    results: matches
                        .iter()
                        .map(|(address, lat, lng)| GeocodeResult {
                            formatted_address: (*address).to_string(),
                            geometry: Geometry {
                                location: LatLng {
                                    lat: *lat,
                                    lng: *lng,
                                },
                            },
                        })
                        .collect(),
                    error_message: None,
                }),
                GeocodeBehavior::Status(status) => Ok(GeocodeResponse {
                    status: ApiStatus::from((*status).to_string()),
                    results: Vec::new(),
                    error_message: None,
                }),
                GeocodeBehavior::TimeOut => Err(CareCompassError::timeout("operation timed out")),
                GeocodeBehavior::Fail => Err(CareCompassError::parse("missing field `status`")),
            }
        }
    }

    enum SearchBehavior {
        Places(Vec<PlaceResult>),
        Status(&'static str),
        TimeOut,
        Fail,
    }

    struct FakePlaces {
        behavior: SearchBehavior,
        calls: AtomicUsize,
        last_query: Mutex<Option<(f64, f64, u32, String)>>,
    }

    impl FakePlaces {
        fn new(behavior: SearchBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl PlaceSearch for FakePlaces {
        async fn nearby(
            &self,
            center: &GeoCoordinate,
            radius_m: u32,
            keyword: &str,
        ) -> Result<NearbyResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() =
                Some((center.latitude, center.longitude, radius_m, keyword.to_string()));
            match &self.behavior {
                SearchBehavior::Places(places) => Ok(NearbyResponse {
                    status: ApiStatus::Ok,
                    results: places.clone(),
                    error_message: None,
                }),
                SearchBehavior::Status(status) => Ok(NearbyResponse {
                    status: ApiStatus::from((*status).to_string()),
                    results: Vec::new(),
                    error_message: None,
                }),
                SearchBehavior::TimeOut => Err(CareCompassError::timeout("operation timed out")),
                SearchBehavior::Fail => Err(CareCompassError::network("connection reset")),
            }
        }
    }

    fn portland() -> GeocodeBehavior {
        GeocodeBehavior::Found(vec![("Portland, OR, USA", 45.515_232, -122.678_385)])
    }

    fn places(count: usize) -> Vec<PlaceResult> {
        (1..=count)
            .map(|i| PlaceResult {
                name: Some(format!("Clinic {i}")),
                vicinity: Some(format!("{i} Burnside St")),
                rating: Some(4.0),
            })
            .collect()
    }

    fn resolver(geocoder: Arc<FakeGeocoder>, search: Arc<FakePlaces>) -> NearbyCareResolver {
        NearbyCareResolver::new(geocoder, search, CareSearchSettings::default())
    }

    fn numbered_entries(text: &str) -> usize {
        text.lines()
            .filter(|line| {
                line.split_once(". ")
                    .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            })
            .count()
    }

    #[tokio::test]
    async fn test_lists_at_most_five_providers() {
        let resolver = resolver(
            FakeGeocoder::new(portland()),
            FakePlaces::new(SearchBehavior::Places(places(7))),
        );

        let outcome = resolver.find_nearby("Portland").await;
        let text = outcome.to_string();

        assert_eq!(outcome.providers().len(), 5);
        assert_eq!(numbered_entries(&text), 5);
        assert!(text.starts_with("Therapists near Portland, OR, USA:"));
        assert!(text.contains("5. Clinic 5"));
        assert!(!text.contains("Clinic 6"));
        assert!(text.ends_with("- Crisis Text Line: Text HOME to 741741"));
    }

    #[tokio::test]
    async fn test_keeps_upstream_order() {
        let mut results = places(3);
        results.reverse();
        let resolver = resolver(
            FakeGeocoder::new(portland()),
            FakePlaces::new(SearchBehavior::Places(results)),
        );

        let outcome = resolver.find_nearby("Portland").await;
        let names: Vec<&str> = outcome.providers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Clinic 3", "Clinic 2", "Clinic 1"]);
    }

    #[tokio::test]
    async fn test_missing_rating_reads_not_available() {
        let resolver = resolver(
            FakeGeocoder::new(portland()),
            FakePlaces::new(SearchBehavior::Places(vec![PlaceResult {
                name: Some("Quiet Mind Therapy".to_string()),
                vicinity: None,
                rating: None,
            }])),
        );

        let text = resolver.find_nearby("Portland").await.to_string();
        assert!(text.contains("Rating: Not available"));
        assert!(!text.contains("N/A/5"));
        assert!(text.contains("📍 Address not available"));
    }

    #[rstest]
    #[case::empty_results(SearchBehavior::Places(Vec::new()))]
    #[case::zero_results_status(SearchBehavior::Status("ZERO_RESULTS"))]
    #[case::denied_status(SearchBehavior::Status("REQUEST_DENIED"))]
    #[tokio::test]
    async fn test_search_without_places_degrades_to_national_resources(
        #[case] behavior: SearchBehavior,
    ) {
        let resolver = resolver(FakeGeocoder::new(portland()), FakePlaces::new(behavior));

        let outcome = resolver.find_nearby("Portland").await;
        let text = outcome.to_string();

        assert_eq!(
            outcome,
            CareOutcome::NoProvidersFound {
                address: "Portland, OR, USA".to_string()
            }
        );
        assert!(text.contains("Portland, OR, USA"));
        assert!(text.contains("988 Suicide & Crisis Lifeline"));
        assert_eq!(numbered_entries(&text), 0);
    }

    #[rstest]
    #[case::zero_results(GeocodeBehavior::Status("ZERO_RESULTS"))]
    #[case::invalid_request(GeocodeBehavior::Status("INVALID_REQUEST"))]
    #[case::ok_but_empty(GeocodeBehavior::Found(Vec::new()))]
    #[tokio::test]
    async fn test_unresolved_location_stops_pipeline(#[case] behavior: GeocodeBehavior) {
        let search = FakePlaces::new(SearchBehavior::Places(places(2)));
        let resolver = resolver(FakeGeocoder::new(behavior), search.clone());

        let outcome = resolver.find_nearby("Springfield-ish").await;

        assert_eq!(
            outcome.to_string(),
            "Unable to find location: Springfield-ish. Please try a different address or city."
        );
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn test_empty_input_is_unresolved(#[case] input: &str) {
        let geocoder = FakeGeocoder::new(portland());
        let resolver = resolver(geocoder.clone(), FakePlaces::new(SearchBehavior::Places(places(1))));

        let outcome = resolver.find_nearby(input).await;

        assert!(matches!(outcome, CareOutcome::LocationUnresolved { .. }));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geocode_timeout_yields_timeout_message() {
        let search = FakePlaces::new(SearchBehavior::Places(places(3)));
        let resolver = resolver(FakeGeocoder::new(GeocodeBehavior::TimeOut), search.clone());

        let text = resolver.find_nearby("Denver").await.to_string();

        assert_eq!(text, "Request timed out. Please try again.");
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_timeout_yields_same_message() {
        let resolver = resolver(
            FakeGeocoder::new(portland()),
            FakePlaces::new(SearchBehavior::TimeOut),
        );

        let outcome = resolver.find_nearby("Portland").await;
        assert_eq!(outcome, CareOutcome::TimedOut);
    }

    #[rstest]
    #[case::geocode_failure(GeocodeBehavior::Fail, SearchBehavior::Places(Vec::new()), "missing field `status`")]
    #[case::search_failure(portland(), SearchBehavior::Fail, "connection reset")]
    #[tokio::test]
    async fn test_unexpected_failure_surfaces_detail_and_crisis_line(
        #[case] geocode: GeocodeBehavior,
        #[case] search: SearchBehavior,
        #[case] detail: &str,
    ) {
        let resolver = resolver(FakeGeocoder::new(geocode), FakePlaces::new(search));

        let text = resolver.find_nearby("Portland").await.to_string();

        assert!(text.starts_with("Error finding therapists: "));
        assert!(text.contains(detail));
        assert!(text.ends_with("Please call 988 for immediate support."));
    }

    #[tokio::test]
    async fn test_uses_first_geocoding_match_and_fixed_search_parameters() {
        let search = FakePlaces::new(SearchBehavior::Places(places(1)));
        let resolver = resolver(
            FakeGeocoder::new(GeocodeBehavior::Found(vec![
                ("Springfield, IL, USA", 39.781_721, -89.650_148),
                ("Springfield, MA, USA", 42.101_483, -72.589_811),
            ])),
            search.clone(),
        );

        let outcome = resolver.find_nearby("Springfield").await;

        assert!(outcome.to_string().starts_with("Therapists near Springfield, IL, USA:"));
        let (lat, lng, radius, keyword) = search.last_query.lock().unwrap().clone().unwrap();
        assert_eq!((lat, lng), (39.781_721, -89.650_148));
        assert_eq!(radius, 8000);
        assert_eq!(keyword, "therapist counselor psychologist mental health");
    }

    #[tokio::test]
    async fn test_repeated_lookup_is_stable() {
        let resolver = resolver(
            FakeGeocoder::new(portland()),
            FakePlaces::new(SearchBehavior::Places(places(4))),
        );

        let first = resolver.find_nearby("Portland").await;
        let second = resolver.find_nearby("Portland").await;
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(portland(), SearchBehavior::Places(places(2)))]
    #[case(portland(), SearchBehavior::Places(Vec::new()))]
    #[case(portland(), SearchBehavior::Status("OVER_QUERY_LIMIT"))]
    #[case(portland(), SearchBehavior::TimeOut)]
    #[case(portland(), SearchBehavior::Fail)]
    #[case(GeocodeBehavior::Fail, SearchBehavior::Places(Vec::new()))]
    #[tokio::test]
    async fn test_every_resolved_or_failed_path_mentions_988(
        #[case] geocode: GeocodeBehavior,
        #[case] search: SearchBehavior,
    ) {
        let resolver = resolver(FakeGeocoder::new(geocode), FakePlaces::new(search));
        let outcome = resolver.find_nearby("Portland").await;
        let text = outcome.to_string();

        assert!(!text.is_empty());
        if outcome != CareOutcome::TimedOut {
            assert!(text.contains("988"), "missing crisis line in: {text}");
        }
    }
}
