//! Wiring for the outbound side: one shared HTTP client, both providers.

use crate::air_quality::openweather::OpenWeatherClient;
use crate::air_quality::AirQualityProvider;
use crate::config::{Config, Secrets};
use crate::narrative::gemini::GeminiClient;
use crate::narrative::NarrativeProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// The two upstream-backed providers, shareable across tasks.
#[derive(Clone)]
pub struct Providers {
    pub air_quality: Arc<dyn AirQualityProvider>,
    pub narrative: Arc<dyn NarrativeProvider>,
}

pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.upstream.user_agent.clone());
    if let Some(secs) = config.upstream.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to build upstream HTTP client")
}

impl Providers {
    pub fn from_config(config: &Config, secrets: &Secrets) -> Result<Self> {
        let http = http_client(config)?;
        let air_quality = OpenWeatherClient::new(
            config.openweather.base_url.clone(),
            secrets.openweather_api_key.clone(),
            http.clone(),
        );
        let narrative = GeminiClient::new(
            config.gemini.clone(),
            secrets.gemini_api_key.clone(),
            http,
        );

        if secrets.openweather_api_key.is_none() {
            tracing::warn!("OPENWEATHERMAP_API_KEY is not set; air-quality requests will fail");
        }
        if secrets.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; narrative requests will fail");
        }

        Ok(Self {
            air_quality: Arc::new(air_quality),
            narrative: Arc::new(narrative),
        })
    }
}
