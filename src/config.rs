//! Configuration management for `CareCompass`
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and provides validation for all configuration settings. Credentials are
//! optional at load time and only required by the component that uses them.

use crate::responder::DEFAULT_SYSTEM_PROMPT;
use crate::{CareCompassError, Result};
use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareCompassConfig {
    /// Tool HTTP server
    #[serde(default)]
    pub server: ServerConfig,
    /// Conversational model settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Outbound calling settings
    #[serde(default)]
    pub telephony: TelephonyConfig,
    /// Geocoding and place search settings
    #[serde(default)]
    pub maps: MapsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Upper bound for a whole tool request, including the model call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Conversational model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Nucleus sampling threshold
    #[serde(default = "default_llm_top_p")]
    pub top_p: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
    /// Persona instruction sent as the system message
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// Outbound calling settings (Twilio)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelephonyConfig {
    #[serde(default = "default_telephony_base_url")]
    pub base_url: String,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Caller ID used for the outbound call
    pub from_number: Option<String>,
    /// Number dialed when an emergency call is triggered
    pub emergency_contact: Option<String>,
    /// Voice response document played when the call connects
    #[serde(default = "default_twiml_url")]
    pub twiml_url: String,
    #[serde(default = "default_telephony_timeout")]
    pub timeout_seconds: u32,
}

/// Geocoding and nearby search settings (Google Maps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
    #[serde(default = "default_maps_timeout")]
    pub timeout_seconds: u32,
    /// Nearby search radius in meters
    #[serde(default = "default_search_radius")]
    pub search_radius_m: u32,
    #[serde(default = "default_search_keyword")]
    pub keyword: String,
    /// Maximum number of providers listed
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// OTLP/HTTP traces endpoint, e.g. `http://localhost:4318/v1/traces`; unset disables export
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    90
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "alibayram/medgemma:4b".to_string()
}

fn default_llm_max_tokens() -> u32 {
    350
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_llm_top_p() -> f32 {
    0.9
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_telephony_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_twiml_url() -> String {
    "http://demo.twilio.com/docs/voice.xml".to_string()
}

fn default_telephony_timeout() -> u32 {
    15
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_maps_timeout() -> u32 {
    10
}

fn default_search_radius() -> u32 {
    8000
}

fn default_search_keyword() -> String {
    "therapist counselor psychologist mental health".to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
            top_p: default_llm_top_p(),
            timeout_seconds: default_llm_timeout(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            base_url: default_telephony_base_url(),
            account_sid: None,
            auth_token: None,
            from_number: None,
            emergency_contact: None,
            twiml_url: default_twiml_url(),
            timeout_seconds: default_telephony_timeout(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_maps_base_url(),
            timeout_seconds: default_maps_timeout(),
            search_radius_m: default_search_radius(),
            keyword: default_search_keyword(),
            max_results: default_max_results(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            otlp_endpoint: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.into())
    }
}

impl LlmConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl TelephonyConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl MapsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl CareCompassConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CARECOMPASS_MAPS__API_KEY -> maps.api_key
        builder = builder.add_source(
            Environment::with_prefix("CARECOMPASS")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CareCompassConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("carecompass.toml")
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.llm.endpoint.is_empty() {
            self.llm.endpoint = default_llm_endpoint();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.max_tokens == 0 {
            self.llm.max_tokens = default_llm_max_tokens();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.llm.system_prompt.trim().is_empty() {
            self.llm.system_prompt = default_system_prompt();
        }
        if self.telephony.base_url.is_empty() {
            self.telephony.base_url = default_telephony_base_url();
        }
        if self.telephony.twiml_url.is_empty() {
            self.telephony.twiml_url = default_twiml_url();
        }
        if self.telephony.timeout_seconds == 0 {
            self.telephony.timeout_seconds = default_telephony_timeout();
        }
        if self.maps.base_url.is_empty() {
            self.maps.base_url = default_maps_base_url();
        }
        if self.maps.timeout_seconds == 0 {
            self.maps.timeout_seconds = default_maps_timeout();
        }
        if self.maps.search_radius_m == 0 {
            self.maps.search_radius_m = default_search_radius();
        }
        if self.maps.max_results == 0 {
            self.maps.max_results = default_max_results();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
    }

    /// Validate all non-credential settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(CareCompassError::config(
                "LLM temperature must be between 0.0 and 2.0",
            ));
        }

        if self.llm.top_p <= 0.0 || self.llm.top_p > 1.0 {
            return Err(CareCompassError::config(
                "LLM top_p must be greater than 0.0 and at most 1.0",
            ));
        }

        for (name, seconds) in [
            ("server.request_timeout_seconds", self.server.request_timeout_seconds),
            ("llm.timeout_seconds", self.llm.timeout_seconds),
            ("telephony.timeout_seconds", self.telephony.timeout_seconds),
            ("maps.timeout_seconds", self.maps.timeout_seconds),
        ] {
            if seconds == 0 || seconds > 300 {
                return Err(CareCompassError::config(format!(
                    "{name} must be between 1 and 300 seconds"
                )));
            }
        }

        if self.maps.search_radius_m > 50_000 {
            return Err(CareCompassError::config(
                "Search radius cannot exceed 50000 meters",
            ));
        }

        if self.maps.max_results == 0 || self.maps.max_results > 20 {
            return Err(CareCompassError::config(
                "maps.max_results must be between 1 and 20",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        if self.maps.keyword.trim().is_empty() {
            return Err(CareCompassError::config("Search keyword cannot be empty"));
        }

        if self.llm.model.trim().is_empty() {
            return Err(CareCompassError::config("LLM model name cannot be empty"));
        }

        for (name, url) in [
            ("llm.endpoint", &self.llm.endpoint),
            ("telephony.base_url", &self.telephony.base_url),
            ("maps.base_url", &self.maps.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CareCompassError::config(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }
}

/// Returns the value of a credential, failing with the dotted key that is missing.
pub fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CareCompassError::config(format!(
            "Missing required setting '{key}'"
        ))),
    }
}
