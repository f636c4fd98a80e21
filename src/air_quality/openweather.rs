//! OpenWeatherMap provider: direct geocoding + current air pollution.

use super::{AirQualityProvider, AirQualityQuery, AirQualityReport, Coordinates};
use crate::config::OPENWEATHER_KEY_VAR;
use crate::error::{ProxyError, Service};
use async_trait::async_trait;
use serde::Deserialize;

/// One hit from `/geo/1.0/direct`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeHit {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
}

pub struct OpenWeatherClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http,
        }
    }

    fn require_key(&self) -> Result<&str, ProxyError> {
        self.api_key
            .as_deref()
            .ok_or(ProxyError::Configuration(OPENWEATHER_KEY_VAR))
    }

    /// Coordinates of the best match for `city`.
    pub async fn geocode(&self, city: &str) -> Result<Coordinates, ProxyError> {
        let api_key = self.require_key()?;
        let url = format!(
            "{base}/geo/1.0/direct?q={q}&limit=1",
            base = self.base_url,
            q = urlencoding::encode(city),
        );
        tracing::info!(city, "Geocoding city via {url}");

        let body = self.get_text(&url, api_key, Service::Geocoding).await?;
        let hits: Vec<GeocodeHit> =
            serde_json::from_str(&body).map_err(|e| ProxyError::parse(Service::Geocoding, e))?;
        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| ProxyError::CityNotFound(city.to_string()))?;

        tracing::debug!(
            city,
            matched = first.name.as_deref().unwrap_or("?"),
            country = first.country.as_deref().unwrap_or("?"),
            lat = first.lat,
            lon = first.lon,
            "Geocoding matched"
        );
        Ok(Coordinates { lat: first.lat, lon: first.lon })
    }

    /// Current air pollution at `coords`. The body is kept byte for byte.
    pub async fn air_pollution(&self, coords: Coordinates) -> Result<AirQualityReport, ProxyError> {
        let api_key = self.require_key()?;
        let url = format!(
            "{base}/data/2.5/air_pollution?lat={lat}&lon={lon}",
            base = self.base_url,
            lat = coords.lat,
            lon = coords.lon,
        );
        tracing::info!("Fetching air quality data from {url}");

        let body = self.get_text(&url, api_key, Service::AirPollution).await?;
        tracing::debug!("Air quality data received: {body}");
        AirQualityReport::from_body(body)
    }

    /// GET `url` with the key appended and return the 2xx body.
    /// The key is added here so that logged URLs never contain it.
    async fn get_text(&self, url: &str, api_key: &str, service: Service) -> Result<String, ProxyError> {
        let resp = self
            .http
            .get(format!("{url}&appid={}", urlencoding::encode(api_key)))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProxyError::transport(service, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "{service} returned an error: {body_text}");
            return Err(ProxyError::Upstream {
                service,
                status: Some(status.as_u16()),
                body: body_text,
            });
        }

        resp.text().await.map_err(|e| ProxyError::transport(service, e))
    }
}

#[async_trait]
impl AirQualityProvider for OpenWeatherClient {
    async fn resolve(&self, query: &AirQualityQuery) -> Result<AirQualityReport, ProxyError> {
        let coords = match query {
            AirQualityQuery::Coordinates(coords) => *coords,
            AirQualityQuery::City(city) => self.geocode(city).await?,
        };
        self.air_pollution(coords).await
    }
}
