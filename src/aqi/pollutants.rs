//! Pollutant concentrations and their bar-chart representation.

use serde::{Deserialize, Serialize};

/// Concentrations from the `components` object of an air-pollution reading,
/// in µg/m³. CO comes in much larger numbers than the rest, which is why the
/// chart scales it down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub co: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<f64>,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nh3: Option<f64>,
}

/// Divisor applied to CO so it fits on the same axis as the other pollutants.
pub const CO_DISPLAY_SCALE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantBar {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
}

/// Bars in chart order: PM2.5, PM10, NO₂, CO (scaled), O₃, SO₂.
pub fn pollutant_bars(c: &Components) -> Vec<PollutantBar> {
    vec![
        PollutantBar { name: "PM2.5", value: c.pm2_5, color: "hsl(var(--primary))" },
        PollutantBar { name: "PM10", value: c.pm10, color: "hsl(var(--accent))" },
        PollutantBar { name: "NO₂", value: c.no2, color: "hsl(var(--aqi-moderate))" },
        PollutantBar { name: "CO", value: c.co / CO_DISPLAY_SCALE, color: "hsl(var(--aqi-unhealthy))" },
        PollutantBar { name: "O₃", value: c.o3, color: "hsl(var(--aqi-unhealthy-sensitive))" },
        PollutantBar { name: "SO₂", value: c.so2, color: "hsl(var(--aqi-good))" },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_keep_order_and_scale_co() {
        let c = Components {
            pm2_5: 45.2,
            pm10: 80.1,
            no2: 12.0,
            co: 300.0,
            o3: 40.0,
            so2: 8.0,
            ..Components::default()
        };
        let bars = pollutant_bars(&c);
        let names: Vec<_> = bars.iter().map(|b| b.name).collect();
        assert_eq!(names, ["PM2.5", "PM10", "NO₂", "CO", "O₃", "SO₂"]);
        assert_eq!(bars[3].value, 3.0);
        assert_eq!(bars[0].value, 45.2);
    }

    #[test]
    fn components_accept_upstream_field_names() {
        let c: Components = serde_json::from_str(
            r#"{"co":201.94,"no":0.02,"no2":0.77,"o3":68.66,"so2":0.64,"pm2_5":0.5,"pm10":0.54,"nh3":0.12}"#,
        )
        .unwrap();
        assert_eq!(c.pm2_5, 0.5);
        assert_eq!(c.nh3, Some(0.12));
    }
}
