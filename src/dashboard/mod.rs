//! View-models for the citizen, policymaker and landing dashboards.
//!
//! Each view fetches air quality through an [`AirQualityProvider`], asks the
//! [`NarrativeProvider`] for text, and keeps the latest panel in a
//! [`ViewState`]. Every load takes a [`Generation`] first; a result whose
//! generation is no longer the latest is dropped, so a slow response for an
//! old location can't overwrite a newer one.
//!
//! [`AirQualityProvider`]: crate::air_quality::AirQualityProvider
//! [`NarrativeProvider`]: crate::narrative::NarrativeProvider

pub mod citizen;
pub mod landing;
pub mod placeholder;
pub mod policymaker;

pub use citizen::{CitizenDashboard, CitizenPanel};
pub use landing::{LandingDashboard, LandingPanel};
pub use placeholder::{PlaceholderGenerator, RandomPlaceholders};
pub use policymaker::{PolicyPanel, PolicymakerDashboard};

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Locations offered by the dashboards' location picker.
pub const PRESET_LOCATIONS: [&str; 12] = [
    "Andhra Pradesh",
    "Delhi",
    "Gujarat",
    "Karnataka",
    "Kerala",
    "Maharashtra",
    "Tamil Nadu",
    "Uttar Pradesh",
    "West Bengal",
    "Rajasthan",
    "Punjab",
    "Haryana",
];

pub const DEFAULT_LOCATION: &str = "Delhi";

// ── Notices ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient notification for the user (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), description: description.into() }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, title: title.into(), description: description.into() }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = match self.level {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Error => "✗",
        };
        write!(f, "{mark} {}: {}", self.title, self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The new panel replaced the previous one.
    Applied,
    /// The load failed; the previous panel is untouched.
    Failed,
    /// A newer load started meanwhile; this result was discarded.
    Superseded,
    /// Blank location; nothing was requested.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub status: LoadStatus,
    pub notice: Option<Notice>,
}

impl LoadOutcome {
    pub fn applied(notice: Option<Notice>) -> Self {
        Self { status: LoadStatus::Applied, notice }
    }

    pub fn failed(notice: Option<Notice>) -> Self {
        Self { status: LoadStatus::Failed, notice }
    }

    pub fn superseded() -> Self {
        Self { status: LoadStatus::Superseded, notice: None }
    }

    pub fn ignored() -> Self {
        Self { status: LoadStatus::Ignored, notice: None }
    }
}

/// Trimmed location, or `None` when there is nothing to search for.
pub fn search_location(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ── Generation-tracked state ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Latest panel of a view, guarded by request generations.
pub struct ViewState<T> {
    latest: AtomicU64,
    current: Mutex<Option<T>>,
}

impl<T: Clone> ViewState<T> {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Start a new request; any generation issued earlier becomes stale.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Store `value` if `generation` is still the latest. Returns whether it
    /// was stored.
    pub fn commit(&self, generation: Generation, value: T) -> bool {
        let mut slot = self.current.lock();
        if !self.is_current(generation) {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn snapshot(&self) -> Option<T> {
        self.current.lock().clone()
    }
}

impl<T: Clone> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted providers shared by the view tests.

    use crate::air_quality::{AirQualityProvider, AirQualityQuery, AirQualityReport};
    use crate::error::{ProxyError, Service};
    use crate::narrative::{NarrativeKind, NarrativeProvider, NarrativeRequest};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    pub fn envelope(aqi: i64, pm2_5: f64) -> serde_json::Value {
        json!({
            "list": [{
                "main": { "aqi": aqi },
                "components": { "pm2_5": pm2_5, "pm10": 80.1, "no2": 12.0, "co": 300.0, "o3": 40.0, "so2": 8.0 }
            }]
        })
    }

    /// Answers per city (or `"coords"`), optionally after a delay.
    #[derive(Default)]
    pub struct ScriptedAir {
        pub answers: HashMap<String, (Duration, Result<serde_json::Value, u16>)>,
        pub calls: Mutex<Vec<AirQualityQuery>>,
    }

    impl ScriptedAir {
        pub fn with(mut self, key: &str, delay_ms: u64, answer: Result<serde_json::Value, u16>) -> Self {
            self.answers.insert(key.to_string(), (Duration::from_millis(delay_ms), answer));
            self
        }
    }

    #[async_trait]
    impl AirQualityProvider for ScriptedAir {
        async fn resolve(&self, query: &AirQualityQuery) -> Result<AirQualityReport, ProxyError> {
            self.calls.lock().push(query.clone());
            let key = match query {
                AirQualityQuery::City(c) => c.clone(),
                AirQualityQuery::Coordinates(_) => "coords".to_string(),
            };
            let Some((delay, answer)) = self.answers.get(&key).cloned() else {
                return Err(ProxyError::CityNotFound(key));
            };
            tokio::time::sleep(delay).await;
            answer.map(|v| AirQualityReport::new(v.to_string())).map_err(|status| ProxyError::Upstream {
                service: Service::AirPollution,
                status: Some(status),
                body: "scripted failure".into(),
            })
        }
    }

    /// Echoes the kind and location; fails for kinds listed in `failing`.
    #[derive(Default)]
    pub struct EchoNarrator {
        pub failing: Vec<NarrativeKind>,
        pub seen: Mutex<Vec<NarrativeRequest>>,
    }

    #[async_trait]
    impl NarrativeProvider for EchoNarrator {
        async fn generate(&self, request: &NarrativeRequest) -> Result<String, ProxyError> {
            self.seen.lock().push(request.clone());
            if self.failing.contains(&request.kind) {
                return Err(ProxyError::Upstream {
                    service: Service::Gemini,
                    status: Some(500),
                    body: "boom".into(),
                });
            }
            Ok(format!(
                "{} for {}",
                request.kind.as_str(),
                request.location.as_deref().unwrap_or("?")
            ))
        }
    }
}
