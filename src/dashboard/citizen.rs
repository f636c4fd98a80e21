//! Citizen dashboard: current AQI, pollutant chart, 5-day outlook, plus an
//! AI summary and health advice for the chosen location.

use super::placeholder::{ForecastPoint, PlaceholderGenerator};
use super::{search_location, LoadOutcome, Notice, ViewState};
use crate::air_quality::{AirQualityProvider, AirQualityQuery};
use crate::aqi::pollutants::{pollutant_bars, Components, PollutantBar};
use crate::aqi::{classify, AqiInfo};
use crate::error::ProxyError;
use crate::narrative::{AqiSnapshot, NarrativeKind, NarrativeProvider, NarrativeRequest};
use crate::upstream::Providers;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

pub const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitizenPanel {
    pub location: String,
    pub aqi: AqiInfo,
    pub snapshot: AqiSnapshot,
    pub components: Components,
    pub pollutants: Vec<PollutantBar>,
    pub forecast: Vec<ForecastPoint>,
    /// `None` when the narrative could not be generated.
    pub summary: Option<String>,
    pub health_advice: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl CitizenPanel {
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("Generating AI summary...")
    }

    pub fn health_text(&self) -> &str {
        self.health_advice.as_deref().unwrap_or("Generating recommendations...")
    }
}

pub struct CitizenDashboard {
    air_quality: Arc<dyn AirQualityProvider>,
    narrative: Arc<dyn NarrativeProvider>,
    placeholders: Arc<dyn PlaceholderGenerator>,
    state: ViewState<CitizenPanel>,
}

impl CitizenDashboard {
    pub fn new(
        air_quality: Arc<dyn AirQualityProvider>,
        narrative: Arc<dyn NarrativeProvider>,
        placeholders: Arc<dyn PlaceholderGenerator>,
    ) -> Self {
        Self {
            air_quality,
            narrative,
            placeholders,
            state: ViewState::new(),
        }
    }

    pub fn from_providers(providers: &Providers, placeholders: Arc<dyn PlaceholderGenerator>) -> Self {
        Self::new(
            providers.air_quality.clone(),
            providers.narrative.clone(),
            placeholders,
        )
    }

    pub fn panel(&self) -> Option<CitizenPanel> {
        self.state.snapshot()
    }

    pub async fn load(&self, location: &str) -> LoadOutcome {
        let Some(location) = search_location(location) else {
            return LoadOutcome::ignored();
        };
        let generation = self.state.begin();

        match self.build_panel(location).await {
            Ok(panel) => {
                if self.state.commit(generation, panel) {
                    LoadOutcome::applied(Some(Notice::info(
                        "Data Updated",
                        format!("Air quality data for {location} loaded successfully"),
                    )))
                } else {
                    tracing::debug!(location, "Discarding superseded citizen panel");
                    LoadOutcome::superseded()
                }
            }
            Err(e) => {
                tracing::error!(location, "Error fetching data: {e}");
                if self.state.is_current(generation) {
                    LoadOutcome::failed(Some(Notice::error("Error", "Failed to fetch air quality data")))
                } else {
                    LoadOutcome::superseded()
                }
            }
        }
    }

    async fn build_panel(&self, location: &str) -> Result<CitizenPanel, ProxyError> {
        let report = self
            .air_quality
            .resolve(&AirQualityQuery::City(location.to_string()))
            .await?;
        let reading = report.current()?;
        let aqi = reading.main.aqi;
        let snapshot = AqiSnapshot::from_reading(aqi, &reading.components);

        let summary_request = NarrativeRequest {
            aqi: snapshot,
            location: Some(location.to_string()),
            kind: NarrativeKind::Summary,
        };
        let health_request = NarrativeRequest {
            aqi: snapshot.particulates_only(),
            location: Some(location.to_string()),
            kind: NarrativeKind::Health,
        };

        // Both only depend on the reading, not on each other.
        let (summary, health_advice) = tokio::join!(
            self.narrative.generate(&summary_request),
            self.narrative.generate(&health_request),
        );

        Ok(CitizenPanel {
            location: location.to_string(),
            aqi: classify(aqi),
            snapshot,
            components: reading.components,
            pollutants: pollutant_bars(&reading.components),
            forecast: self.placeholders.aqi_forecast(aqi, FORECAST_DAYS),
            summary: narrative_or_none(summary, NarrativeKind::Summary),
            health_advice: narrative_or_none(health_advice, NarrativeKind::Health),
            fetched_at: Utc::now(),
        })
    }
}

/// Narrative failures blank that one panel section; they never fail the view.
pub(super) fn narrative_or_none(result: Result<String, ProxyError>, kind: NarrativeKind) -> Option<String> {
    match result {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(kind = kind.as_str(), "Narrative unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{envelope, EchoNarrator, ScriptedAir};
    use super::super::{LoadStatus, NoticeLevel, RandomPlaceholders};
    use super::*;

    fn dashboard(air: ScriptedAir, narrator: EchoNarrator) -> (CitizenDashboard, Arc<EchoNarrator>) {
        let narrator = Arc::new(narrator);
        let dash = CitizenDashboard::new(Arc::new(air), narrator.clone(), Arc::new(RandomPlaceholders));
        (dash, narrator)
    }

    #[tokio::test]
    async fn load_builds_a_full_panel() {
        let air = ScriptedAir::default().with("Delhi", 0, Ok(envelope(3, 45.2)));
        let (dash, narrator) = dashboard(air, EchoNarrator::default());

        let outcome = dash.load("Delhi").await;
        assert_eq!(outcome.status, LoadStatus::Applied);
        let notice = outcome.notice.unwrap();
        assert_eq!(notice.title, "Data Updated");
        assert_eq!(notice.description, "Air quality data for Delhi loaded successfully");

        let panel = dash.panel().unwrap();
        assert_eq!(panel.aqi.label, "Unhealthy (Sensitive)");
        assert_eq!(panel.snapshot.pm25, Some(45.2));
        assert_eq!(panel.forecast.len(), FORECAST_DAYS);
        assert_eq!(panel.pollutants[3].value, 3.0);
        assert_eq!(panel.summary_text(), "summary for Delhi");
        assert_eq!(panel.health_text(), "health for Delhi");

        let seen = narrator.seen.lock();
        let health = seen.iter().find(|r| r.kind == NarrativeKind::Health).unwrap();
        assert!(health.aqi.no2.is_none() && health.aqi.co.is_none() && health.aqi.o3.is_none());
        let summary = seen.iter().find(|r| r.kind == NarrativeKind::Summary).unwrap();
        assert_eq!(summary.aqi.co, Some(300.0));
    }

    #[tokio::test]
    async fn narrative_failure_leaves_pending_text() {
        let air = ScriptedAir::default().with("Delhi", 0, Ok(envelope(2, 20.0)));
        let narrator = EchoNarrator { failing: vec![NarrativeKind::Health], ..Default::default() };
        let (dash, _) = dashboard(air, narrator);

        assert_eq!(dash.load("Delhi").await.status, LoadStatus::Applied);
        let panel = dash.panel().unwrap();
        assert_eq!(panel.summary_text(), "summary for Delhi");
        assert_eq!(panel.health_text(), "Generating recommendations...");
    }

    #[tokio::test]
    async fn air_failure_keeps_previous_panel_and_notifies() {
        let air = ScriptedAir::default()
            .with("Delhi", 0, Ok(envelope(1, 5.0)))
            .with("Kerala", 0, Err(503));
        let (dash, _) = dashboard(air, EchoNarrator::default());

        dash.load("Delhi").await;
        let outcome = dash.load("Kerala").await;
        assert_eq!(outcome.status, LoadStatus::Failed);
        let notice = outcome.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.description, "Failed to fetch air quality data");
        assert_eq!(dash.panel().unwrap().location, "Delhi");
    }

    #[tokio::test]
    async fn blank_location_is_ignored_without_upstream_calls() {
        let air = Arc::new(ScriptedAir::default().with("Delhi", 0, Ok(envelope(2, 20.0))));
        let dash = CitizenDashboard::new(air.clone(), Arc::new(EchoNarrator::default()), Arc::new(RandomPlaceholders));

        dash.load("Delhi").await;
        let outcome = dash.load("   ").await;
        assert_eq!(outcome.status, LoadStatus::Ignored);
        assert!(outcome.notice.is_none());
        assert_eq!(air.calls.lock().len(), 1);
        assert_eq!(dash.panel().unwrap().location, "Delhi");
    }

    #[tokio::test]
    async fn location_is_trimmed_before_lookup() {
        let air = Arc::new(ScriptedAir::default().with("Kerala", 0, Ok(envelope(1, 4.0))));
        let dash = CitizenDashboard::new(air.clone(), Arc::new(EchoNarrator::default()), Arc::new(RandomPlaceholders));

        assert_eq!(dash.load("  Kerala ").await.status, LoadStatus::Applied);
        assert_eq!(air.calls.lock()[0], AirQualityQuery::City("Kerala".into()));
        assert_eq!(dash.panel().unwrap().location, "Kerala");
    }

    #[tokio::test]
    async fn empty_envelope_is_a_failed_load() {
        let air = ScriptedAir::default().with("Delhi", 0, Ok(serde_json::json!({"list": []})));
        let (dash, narrator) = dashboard(air, EchoNarrator::default());

        assert_eq!(dash.load("Delhi").await.status, LoadStatus::Failed);
        assert!(dash.panel().is_none());
        assert!(narrator.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn slow_superseded_load_does_not_overwrite_newer_one() {
        let air = ScriptedAir::default()
            .with("Delhi", 200, Ok(envelope(5, 150.0)))
            .with("Kerala", 0, Ok(envelope(1, 4.0)));
        let (dash, _) = dashboard(air, EchoNarrator::default());

        let (slow, fast) = tokio::join!(dash.load("Delhi"), async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            dash.load("Kerala").await
        });

        assert_eq!(fast.status, LoadStatus::Applied);
        assert_eq!(slow.status, LoadStatus::Superseded);
        assert!(slow.notice.is_none());
        let panel = dash.panel().unwrap();
        assert_eq!(panel.location, "Kerala");
        assert_eq!(panel.aqi.label, "Good");
    }
}
