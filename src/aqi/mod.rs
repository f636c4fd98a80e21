//! AQI classification: category number → label and theme colours.
//!
//! OpenWeatherMap reports a 1..=5 category. Anything outside that range is
//! shown as Hazardous, so [`classify`] is total over `i64`.

pub mod pollutants;

use serde::Serialize;

/// Display bucket for an AQI category, mildest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn from_category(category: i64) -> Self {
        match category {
            1 => AqiLevel::Good,
            2 => AqiLevel::Moderate,
            3 => AqiLevel::UnhealthySensitive,
            4 => AqiLevel::Unhealthy,
            5 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthySensitive => "Unhealthy (Sensitive)",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }

    /// CSS custom property holding this level's hue.
    pub fn palette_token(&self) -> &'static str {
        match self {
            AqiLevel::Good => "--aqi-good",
            AqiLevel::Moderate => "--aqi-moderate",
            AqiLevel::UnhealthySensitive => "--aqi-unhealthy-sensitive",
            AqiLevel::Unhealthy => "--aqi-unhealthy",
            AqiLevel::VeryUnhealthy => "--aqi-very-unhealthy",
            AqiLevel::Hazardous => "--aqi-hazardous",
        }
    }
}

/// Alpha applied to the foreground colour for the badge background.
pub const BACKGROUND_ALPHA: f32 = 0.1;

/// What a view needs to draw the AQI badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiInfo {
    pub level: AqiLevel,
    pub label: &'static str,
    /// Foreground colour, e.g. `hsl(var(--aqi-good))`.
    pub color: String,
    /// Foreground at [`BACKGROUND_ALPHA`], e.g. `hsl(var(--aqi-good) / 0.1)`.
    pub background: String,
}

pub fn classify(category: i64) -> AqiInfo {
    let level = AqiLevel::from_category(category);
    let token = level.palette_token();
    AqiInfo {
        level,
        label: level.label(),
        color: format!("hsl(var({token}))"),
        background: format!("hsl(var({token}) / {BACKGROUND_ALPHA})"),
    }
}
