//! Placeholder trend and forecast series.
//!
//! None of this is a prediction. The dashboards only need plausible-looking
//! series for their charts until a real model exists, and this trait is where
//! that model would plug in.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub label: String,
    pub aqi: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyTrendPoint {
    pub label: String,
    pub before_policy: u32,
    pub after_policy: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub label: String,
    pub pm25: f64,
}

pub trait PlaceholderGenerator: Send + Sync {
    /// One AQI category per day, starting from today's `aqi`.
    fn aqi_forecast(&self, aqi: i64, days: usize) -> Vec<ForecastPoint>;

    /// Monthly pollution levels before and after an intervention.
    fn policy_history(&self, months: usize) -> Vec<PolicyTrendPoint>;

    /// Daily PM2.5 around today's value.
    fn pm25_projection(&self, pm25: f64, days: usize) -> Vec<ProjectionPoint>;
}

/// Uniformly jittered series from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPlaceholders;

impl RandomPlaceholders {
    pub const AQI_MIN: i64 = 1;
    pub const AQI_MAX: i64 = 5;

    fn below(n: u32) -> u32 {
        rand::random::<u32>() % n
    }
}

impl PlaceholderGenerator for RandomPlaceholders {
    fn aqi_forecast(&self, aqi: i64, days: usize) -> Vec<ForecastPoint> {
        (1..=days)
            .map(|day| {
                let jitter = i64::from(Self::below(3)) - 1;
                ForecastPoint {
                    label: format!("Day {day}"),
                    aqi: (aqi + jitter).clamp(Self::AQI_MIN, Self::AQI_MAX),
                }
            })
            .collect()
    }

    fn policy_history(&self, months: usize) -> Vec<PolicyTrendPoint> {
        (1..=months)
            .map(|month| PolicyTrendPoint {
                label: format!("Month {month}"),
                before_policy: 150 + Self::below(50),
                after_policy: 100 + Self::below(40),
            })
            .collect()
    }

    fn pm25_projection(&self, pm25: f64, days: usize) -> Vec<ProjectionPoint> {
        (1..=days)
            .map(|day| ProjectionPoint {
                label: format!("Day {day}"),
                pm25: pm25 + rand::random::<f64>() * 20.0 - 10.0,
            })
            .collect()
    }
}
