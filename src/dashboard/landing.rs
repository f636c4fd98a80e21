//! Landing page badge: AQI at the visitor's position, or a default city
//! when no position is available.

use super::{LoadOutcome, Notice, ViewState};
use crate::air_quality::{AirQualityProvider, AirQualityQuery, Coordinates};
use crate::aqi::{classify, AqiInfo};
use crate::error::ProxyError;
use serde::Serialize;
use std::sync::Arc;

pub const FALLBACK_CITY: &str = "New Delhi";
pub const OWN_LOCATION_LABEL: &str = "Your Location";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingPanel {
    pub location_label: String,
    pub category: i64,
    pub aqi: AqiInfo,
}

pub struct LandingDashboard {
    air_quality: Arc<dyn AirQualityProvider>,
    state: ViewState<LandingPanel>,
}

impl LandingDashboard {
    pub fn new(air_quality: Arc<dyn AirQualityProvider>) -> Self {
        Self {
            air_quality,
            state: ViewState::new(),
        }
    }

    pub fn panel(&self) -> Option<LandingPanel> {
        self.state.snapshot()
    }

    /// Show AQI for `position`, or for [`FALLBACK_CITY`] without one. Only a
    /// failed position lookup raises a notice; the fallback fails quietly.
    pub async fn locate(&self, position: Option<Coordinates>) -> LoadOutcome {
        let generation = self.state.begin();
        let (query, label) = match position {
            Some(coords) => (AirQualityQuery::Coordinates(coords), OWN_LOCATION_LABEL),
            None => (AirQualityQuery::City(FALLBACK_CITY.to_string()), FALLBACK_CITY),
        };

        match self.fetch(&query, label).await {
            Ok(panel) => {
                if self.state.commit(generation, panel) {
                    LoadOutcome::applied(None)
                } else {
                    LoadOutcome::superseded()
                }
            }
            Err(e) => {
                tracing::error!("Error fetching AQI: {e}");
                if !self.state.is_current(generation) {
                    LoadOutcome::superseded()
                } else if position.is_some() {
                    LoadOutcome::failed(Some(Notice::error("Error", "Failed to fetch air quality data")))
                } else {
                    LoadOutcome::failed(None)
                }
            }
        }
    }

    async fn fetch(&self, query: &AirQualityQuery, label: &str) -> Result<LandingPanel, ProxyError> {
        let reading = self.air_quality.resolve(query).await?.current()?;
        Ok(LandingPanel {
            location_label: label.to_string(),
            category: reading.main.aqi,
            aqi: classify(reading.main.aqi),
        })
    }
}
