//! Structured result of a nearby care lookup and its text rendering

use std::fmt::Display;

use crate::models::CareProvider;

/// Backstop appended to every listing once a location has been resolved
pub const NATIONAL_RESOURCES: &str = "National resources:\n\
- 988 Suicide & Crisis Lifeline\n\
- Crisis Text Line: Text HOME to 741741";

/// Outcome of one lookup. Rendered to user-facing text via `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum CareOutcome {
    /// At least one provider near the resolved address
    Providers {
        address: String,
        providers: Vec<CareProvider>,
    },
    /// Location resolved, but the search failed or came back empty
    NoProvidersFound { address: String },
    /// The geocoder could not make sense of the input
    LocationUnresolved { query: String },
    /// Geocoding or search exceeded its timeout
    TimedOut,
    /// Anything else; `detail` is surfaced to the user
    Failed { detail: String },
}

impl CareOutcome {
    /// Stable machine-readable tag
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CareOutcome::Providers { .. } => "providers",
            CareOutcome::NoProvidersFound { .. } => "no_providers_found",
            CareOutcome::LocationUnresolved { .. } => "location_unresolved",
            CareOutcome::TimedOut => "timed_out",
            CareOutcome::Failed { .. } => "failed",
        }
    }

    #[must_use]
    pub fn providers(&self) -> &[CareProvider] {
        match self {
            CareOutcome::Providers { providers, .. } => providers,
            _ => &[],
        }
    }
}

impl Display for CareOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareOutcome::Providers { address, providers } => {
                writeln!(f, "Therapists near {address}:")?;
                writeln!(f)?;
                for (index, provider) in providers.iter().enumerate() {
                    write!(f, "{}. {provider}", index + 1)?;
                    writeln!(f)?;
                }
                write!(f, "{NATIONAL_RESOURCES}")
            }
            CareOutcome::NoProvidersFound { address } => {
                write!(f, "No therapists found near {address}.\n\n{NATIONAL_RESOURCES}")
            }
            CareOutcome::LocationUnresolved { query } => write!(
                f,
                "Unable to find location: {query}. Please try a different address or city."
            ),
            CareOutcome::TimedOut => write!(f, "Request timed out. Please try again."),
            CareOutcome::Failed { detail } => write!(
                f,
                "Error finding therapists: {detail}\n\nPlease call 988 for immediate support."
            ),
        }
    }
}
