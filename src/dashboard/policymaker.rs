//! Policymaker dashboard: key metrics, intervention history, PM2.5 outlook,
//! hotspots and AI policy recommendations.

use super::citizen::narrative_or_none;
use super::placeholder::{PlaceholderGenerator, PolicyTrendPoint, ProjectionPoint};
use super::{search_location, LoadOutcome, Notice, ViewState};
use crate::air_quality::{AirQualityProvider, AirQualityQuery};
use crate::aqi::{classify, AqiInfo};
use crate::error::ProxyError;
use crate::narrative::{AqiSnapshot, NarrativeKind, NarrativeProvider, NarrativeRequest};
use crate::upstream::Providers;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub const HISTORY_MONTHS: usize = 7;
pub const PROJECTION_DAYS: usize = 7;

/// AQI category at which hotspot zones are flagged.
pub const HOTSPOT_THRESHOLD: i64 = 4;
pub const HOTSPOT_ZONES: [&str; 3] = ["Industrial Zone", "Traffic Junction", "Construction Area"];

pub fn hotspots(aqi: i64) -> Vec<&'static str> {
    if aqi >= HOTSPOT_THRESHOLD {
        HOTSPOT_ZONES.to_vec()
    } else {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyPanel {
    pub location: String,
    pub aqi: AqiInfo,
    pub snapshot: AqiSnapshot,
    pub history: Vec<PolicyTrendPoint>,
    pub projection: Vec<ProjectionPoint>,
    pub hotspots: Vec<&'static str>,
    pub recommendations: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl PolicyPanel {
    pub fn recommendations_text(&self) -> &str {
        self.recommendations
            .as_deref()
            .unwrap_or("Generating policy recommendations...")
    }
}

pub struct PolicymakerDashboard {
    air_quality: Arc<dyn AirQualityProvider>,
    narrative: Arc<dyn NarrativeProvider>,
    placeholders: Arc<dyn PlaceholderGenerator>,
    state: ViewState<PolicyPanel>,
}

impl PolicymakerDashboard {
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

    pub fn panel(&self) -> Option<PolicyPanel> {
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
                        "Data Loaded",
                        format!("Policy analytics for {location} updated"),
                    )))
                } else {
                    LoadOutcome::superseded()
                }
            }
            Err(e) => {
                tracing::error!(location, "Error fetching policy data: {e}");
                if self.state.is_current(generation) {
                    LoadOutcome::failed(Some(Notice::error("Error", "Failed to fetch policy data")))
                } else {
                    LoadOutcome::superseded()
                }
            }
        }
    }

    async fn build_panel(&self, location: &str) -> Result<PolicyPanel, ProxyError> {
        let report = self
            .air_quality
            .resolve(&AirQualityQuery::City(location.to_string()))
            .await?;
        let reading = report.current()?;
        let aqi = reading.main.aqi;
        let snapshot = AqiSnapshot::from_reading(aqi, &reading.components);

        let request = NarrativeRequest {
            aqi: snapshot,
            location: Some(location.to_string()),
            kind: NarrativeKind::Policy,
        };
        let recommendations = narrative_or_none(self.narrative.generate(&request).await, NarrativeKind::Policy);

        Ok(PolicyPanel {
            location: location.to_string(),
            aqi: classify(aqi),
            snapshot,
            history: self.placeholders.policy_history(HISTORY_MONTHS),
            projection: self
                .placeholders
                .pm25_projection(reading.components.pm2_5, PROJECTION_DAYS),
            hotspots: hotspots(aqi),
            recommendations,
            fetched_at: Utc::now(),
        })
    }

    /// Plain-text report of the current panel, `None` before the first load.
    pub fn export_report(&self) -> Option<String> {
        self.panel().map(|panel| PolicyReport(&panel).to_string())
    }
}

/// Plain-text rendering of a [`PolicyPanel`].
pub struct PolicyReport<'a>(pub &'a PolicyPanel);

impl fmt::Display for PolicyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let panel = self.0;
        let s = &panel.snapshot;
        let metric = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"));

        writeln!(f, "Air Quality Policy Report: {}", panel.location)?;
        writeln!(f, "Generated: {}", panel.fetched_at.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f)?;
        writeln!(f, "Current AQI: {} ({})", s.aqi, panel.aqi.label)?;
        writeln!(f, "PM2.5: {} µg/m³", metric(s.pm25))?;
        writeln!(f, "PM10: {} µg/m³", metric(s.pm10))?;
        writeln!(f, "NO2: {} µg/m³", metric(s.no2))?;
        writeln!(f, "Hotspots: {}", panel.hotspots.len())?;
        for zone in &panel.hotspots {
            writeln!(f, "  - {zone}")?;
        }

        writeln!(f)?;
        writeln!(f, "Policy impact (before → after):")?;
        for point in &panel.history {
            writeln!(f, "  {}: {} → {}", point.label, point.before_policy, point.after_policy)?;
        }

        writeln!(f)?;
        writeln!(f, "PM2.5 outlook:")?;
        for point in &panel.projection {
            writeln!(f, "  {}: {:.1}", point.label, point.pm25)?;
        }

        writeln!(f)?;
        writeln!(f, "Recommendations:")?;
        writeln!(f, "{}", panel.recommendations_text())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{envelope, EchoNarrator, ScriptedAir};
    use super::super::{LoadStatus, RandomPlaceholders};
    use super::*;

    fn dashboard(air: ScriptedAir, narrator: EchoNarrator) -> (PolicymakerDashboard, Arc<EchoNarrator>) {
        let narrator = Arc::new(narrator);
        let dash = PolicymakerDashboard::new(Arc::new(air), narrator.clone(), Arc::new(RandomPlaceholders));
        (dash, narrator)
    }

    #[test]
    fn hotspots_appear_from_unhealthy_upward() {
        assert!(hotspots(1).is_empty());
        assert!(hotspots(3).is_empty());
        assert_eq!(hotspots(4), HOTSPOT_ZONES.to_vec());
        assert_eq!(hotspots(5).len(), 3);
    }

    #[tokio::test]
    async fn load_requests_policy_narrative_with_full_data() {
        let air = ScriptedAir::default().with("Punjab", 0, Ok(envelope(4, 95.0)));
        let (dash, narrator) = dashboard(air, EchoNarrator::default());

        let outcome = dash.load("Punjab").await;
        assert_eq!(outcome.status, LoadStatus::Applied);
        assert_eq!(outcome.notice.unwrap().description, "Policy analytics for Punjab updated");

        let panel = dash.panel().unwrap();
        assert_eq!(panel.hotspots.len(), 3);
        assert_eq!(panel.history.len(), HISTORY_MONTHS);
        assert_eq!(panel.projection.len(), PROJECTION_DAYS);
        assert_eq!(panel.recommendations_text(), "policy for Punjab");

        let seen = narrator.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, NarrativeKind::Policy);
        assert_eq!(seen[0].aqi.no2, Some(12.0));
    }

    #[tokio::test]
    async fn blank_location_is_ignored() {
        let (dash, narrator) = dashboard(ScriptedAir::default(), EchoNarrator::default());
        let outcome = dash.load(" \t").await;
        assert_eq!(outcome.status, LoadStatus::Ignored);
        assert!(outcome.notice.is_none());
        assert!(narrator.seen.lock().is_empty());
        assert!(dash.panel().is_none());
    }

    #[tokio::test]
    async fn failure_notice_names_policy_data() {
        let air = ScriptedAir::default().with("Punjab", 0, Err(401));
        let (dash, _) = dashboard(air, EchoNarrator::default());

        let outcome = dash.load("Punjab").await;
        assert_eq!(outcome.status, LoadStatus::Failed);
        assert_eq!(outcome.notice.unwrap().description, "Failed to fetch policy data");
        assert!(dash.export_report().is_none());
    }

    #[tokio::test]
    async fn report_lists_metrics_and_recommendations() {
        let air = ScriptedAir::default().with("Delhi", 0, Ok(envelope(5, 150.25)));
        let narrator = EchoNarrator { failing: vec![NarrativeKind::Policy], ..Default::default() };
        let (dash, _) = dashboard(air, narrator);
        dash.load("Delhi").await;

        let report = dash.export_report().unwrap();
        assert!(report.starts_with("Air Quality Policy Report: Delhi"));
        assert!(report.contains("Current AQI: 5 (Very Unhealthy)"));
        assert!(report.contains("PM2.5: 150.2 µg/m³") || report.contains("PM2.5: 150.3 µg/m³"));
        assert!(report.contains("Hotspots: 3"));
        assert!(report.contains("  - Traffic Junction"));
        assert!(report.contains("Month 7:"));
        assert!(report.contains("Generating policy recommendations..."));
    }
}
