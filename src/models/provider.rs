//! Care provider model and its presentation

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::maps::PlaceResult;

const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_ADDRESS: &str = "Address not available";
const UNKNOWN_RATING: &str = "Not available";

/// A nearby mental-health provider as listed to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareProvider {
    pub name: String,
    /// Coarse street-level address fragment
    pub vicinity: String,
    /// User rating on a 0-5 scale
    pub rating: Option<f64>,
}

impl CareProvider {
    /// Rating as shown to the user, e.g. `4.5/5` or `Not available`
    #[must_use]
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("{rating}/5"),
            None => UNKNOWN_RATING.to_string(),
        }
    }
}

impl From<PlaceResult> for CareProvider {
    fn from(place: PlaceResult) -> Self {
        Self {
            name: non_blank(place.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            vicinity: non_blank(place.vicinity).unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            rating: place
                .rating
                .filter(|r| r.is_finite() && (0.0..=5.0).contains(r)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Display for CareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "   📍 {}", self.vicinity)?;
        writeln!(f, "   ⭐ Rating: {}", self.rating_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn place(name: Option<&str>, vicinity: Option<&str>, rating: Option<f64>) -> PlaceResult {
        PlaceResult {
            name: name.map(String::from),
            vicinity: vicinity.map(String::from),
            rating,
        }
    }

    #[test]
    fn test_conversion_keeps_present_fields() {
        let provider = CareProvider::from(place(
            Some("Mission Counseling"),
            Some("123 Valencia St, San Francisco"),
            Some(4.6),
        ));
        assert_eq!(provider.name, "Mission Counseling");
        assert_eq!(provider.vicinity, "123 Valencia St, San Francisco");
        assert_eq!(provider.rating, Some(4.6));
    }

    #[test]
    fn test_conversion_defaults_missing_fields() {
        let provider = CareProvider::from(place(None, Some(""), None));
        assert_eq!(provider.name, "Unknown");
        assert_eq!(provider.vicinity, "Address not available");
        assert_eq!(provider.rating, None);
    }

    #[rstest]
    #[case(Some(4.5), "4.5/5")]
    #[case(Some(5.0), "5/5")]
    #[case(None, "Not available")]
    fn test_rating_label(#[case] rating: Option<f64>, #[case] expected: &str) {
        let provider = CareProvider {
            name: "Clinic".to_string(),
            vicinity: "Main St".to_string(),
            rating,
        };
        assert_eq!(provider.rating_label(), expected);
    }

    #[test]
    fn test_out_of_range_rating_is_dropped() {
        let provider = CareProvider::from(place(Some("Clinic"), None, Some(7.0)));
        assert_eq!(provider.rating, None);
    }

    #[test]
    fn test_display_spans_three_lines() {
        let provider = CareProvider {
            name: "Bay Area Therapy".to_string(),
            vicinity: "500 Market St".to_string(),
            rating: None,
        };
        assert_eq!(
            provider.to_string(),
            "Bay Area Therapy\n   📍 500 Market St\n   ⭐ Rating: Not available\n"
        );
    }
}
