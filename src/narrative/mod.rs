//! Narrative generation: AQI data → prompt → generated text.
//!
//! The [`NarrativeProvider`] trait is the seam between views/gateway and the
//! generative backend; [`gemini::GeminiClient`] is the production provider.
//! Prompt wording lives in [`prompt`].

pub mod gemini;
pub mod prompt;

use crate::aqi::pollutants::Components;
use crate::error::ProxyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Returned in place of an error when the model produces no text.
pub const FALLBACK_TEXT: &str = "Unable to generate summary";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeKind {
    #[default]
    Summary,
    Health,
    Policy,
}

impl NarrativeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeKind::Summary => "summary",
            NarrativeKind::Health => "health",
            NarrativeKind::Policy => "policy",
        }
    }
}

impl FromStr for NarrativeKind {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(NarrativeKind::Summary),
            "health" => Ok(NarrativeKind::Health),
            "policy" => Ok(NarrativeKind::Policy),
            other => Err(ProxyError::InvalidRequest(format!(
                "Unknown narrative type: {other}"
            ))),
        }
    }
}

/// The AQI fields a prompt may mention. Pollutants are optional because
/// callers send only the subset a narrative needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AqiSnapshot {
    pub aqi: i64,
    #[serde(default, alias = "pm2_5", skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
}

impl AqiSnapshot {
    pub fn from_reading(aqi: i64, c: &Components) -> Self {
        Self {
            aqi,
            pm25: Some(c.pm2_5),
            pm10: Some(c.pm10),
            no2: Some(c.no2),
            co: Some(c.co),
            o3: Some(c.o3),
            so2: Some(c.so2),
        }
    }

    /// Only AQI and particulates, as the health narrative is given.
    pub fn particulates_only(&self) -> Self {
        Self {
            aqi: self.aqi,
            pm25: self.pm25,
            pm10: self.pm10,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    pub aqi: AqiSnapshot,
    pub location: Option<String>,
    pub kind: NarrativeKind,
}

/// Request body accepted by `/generate-ai-summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeBody {
    #[serde(rename = "aqiData", default)]
    pub aqi_data: Option<serde_json::Value>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl NarrativeBody {
    pub fn into_request(self) -> Result<NarrativeRequest, ProxyError> {
        let raw = self
            .aqi_data
            .ok_or_else(|| ProxyError::InvalidRequest("aqiData is required".into()))?;
        let aqi: AqiSnapshot = serde_json::from_value(raw)
            .map_err(|e| ProxyError::InvalidRequest(format!("Invalid aqiData: {e}")))?;
        let kind = match self.kind.as_deref() {
            None => NarrativeKind::default(),
            Some(k) => k.parse()?,
        };
        Ok(NarrativeRequest {
            aqi,
            location: self.city.filter(|c| !c.trim().is_empty()),
            kind,
        })
    }
}

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generate text for `request`. Yields [`FALLBACK_TEXT`] rather than an
    /// error when the backend answers successfully but with no text.
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, ProxyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> NarrativeBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn type_defaults_to_summary() {
        let req = body(json!({"aqiData": {"aqi": 2}, "city": "Delhi"}))
            .into_request()
            .unwrap();
        assert_eq!(req.kind, NarrativeKind::Summary);
        assert_eq!(req.location.as_deref(), Some("Delhi"));
    }

    #[test]
    fn upstream_pm2_5_spelling_is_accepted() {
        let req = body(json!({"aqiData": {"aqi": 3, "pm2_5": 45.2, "pm10": 80.1}, "type": "health"}))
            .into_request()
            .unwrap();
        assert_eq!(req.aqi.pm25, Some(45.2));
        assert_eq!(req.kind, NarrativeKind::Health);
        assert!(req.location.is_none());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = body(json!({"aqiData": {"aqi": 1}, "type": "poem"}))
            .into_request()
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown narrative type: poem");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn missing_aqi_data_is_rejected() {
        let err = body(json!({"city": "Delhi"})).into_request().unwrap_err();
        assert!(matches!(err, ProxyError::InvalidRequest(_)));
    }

    #[test]
    fn particulates_only_drops_gases() {
        let full = AqiSnapshot::from_reading(
            4,
            &Components { pm2_5: 90.0, pm10: 120.0, no2: 30.0, co: 500.0, o3: 60.0, so2: 9.0, ..Components::default() },
        );
        let subset = full.particulates_only();
        assert_eq!(subset.pm25, Some(90.0));
        assert!(subset.no2.is_none() && subset.co.is_none() && subset.o3.is_none());
    }
}
