//! Air-quality lookup: city name or coordinates → upstream pollution envelope.
//!
//! Defines the [`AirQualityProvider`] trait the gateway and dashboards talk
//! to, plus the request and envelope types. The only production provider is
//! [`openweather::OpenWeatherClient`].

pub mod openweather;

use crate::aqi::pollutants::Components;
use crate::error::{ProxyError, Service};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved lookup: exactly one of city or coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum AirQualityQuery {
    City(String),
    Coordinates(Coordinates),
}

/// Request body accepted by `/fetch-air-quality`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirQualityRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl AirQualityRequest {
    /// Coordinates win when both are present; a blank city counts as absent.
    pub fn into_query(self) -> Result<AirQualityQuery, ProxyError> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(AirQualityQuery::Coordinates(Coordinates { lat, lon }));
        }
        match self.city {
            Some(city) if !city.trim().is_empty() => Ok(AirQualityQuery::City(city.trim().to_string())),
            _ => Err(ProxyError::InvalidRequest(
                "Either city or lat/lon is required".into(),
            )),
        }
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirPollutionEnvelope {
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirPollutionEntry {
    #[serde(default)]
    pub dt: Option<i64>,
    pub main: AqiMain,
    pub components: Components,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AqiMain {
    pub aqi: i64,
}

/// The upstream body exactly as received, with typed accessors on top.
///
/// The proxy relays [`AirQualityReport::raw`] byte for byte; views go
/// through [`AirQualityReport::current`].
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityReport {
    pub raw: String,
}

impl AirQualityReport {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Accept an upstream body once it is known to be JSON. Its shape is
    /// only checked by the typed views.
    pub fn from_body(body: String) -> Result<Self, ProxyError> {
        serde_json::from_str::<serde::de::IgnoredAny>(&body)
            .map_err(|e| ProxyError::parse(Service::AirPollution, e))?;
        Ok(Self { raw: body })
    }

    pub fn envelope(&self) -> Result<AirPollutionEnvelope, ProxyError> {
        serde_json::from_str(&self.raw).map_err(|e| ProxyError::parse(Service::AirPollution, e))
    }

    /// First reading in the envelope.
    pub fn current(&self) -> Result<AirPollutionEntry, ProxyError> {
        self.envelope()?
            .list
            .into_iter()
            .next()
            .ok_or_else(|| ProxyError::parse(Service::AirPollution, "envelope contains no readings"))
    }
}

#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    /// Resolve a query to the current air-pollution envelope.
    ///
    /// City lookups geocode first and then fetch pollution, strictly in that
    /// order. Coordinate lookups skip geocoding.
    async fn resolve(&self, query: &AirQualityQuery) -> Result<AirQualityReport, ProxyError>;
}
