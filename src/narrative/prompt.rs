//! Prompt templates, one per [`NarrativeKind`].
//!
//! Each template mentions only the fields its narrative is about: the health
//! prompt carries AQI and particulates, policy adds NO2, and the summary
//! carries everything except SO2.

use super::{AqiSnapshot, NarrativeKind, NarrativeRequest};

const UNKNOWN_LOCATION: &str = "your area";

fn value(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

pub fn render(request: &NarrativeRequest) -> String {
    let location = request.location.as_deref().unwrap_or(UNKNOWN_LOCATION);
    let d: &AqiSnapshot = &request.aqi;

    match request.kind {
        NarrativeKind::Summary => format!(
            "Based on this air quality data for {location}: AQI: {aqi}, PM2.5: {pm25}, PM10: {pm10}, NO2: {no2}, CO: {co}, O3: {o3}.\n\
             Generate a brief, friendly 2-3 sentence summary about today's air quality, any trends, and what it means for residents. \
             Keep it conversational and easy to understand.",
            aqi = d.aqi,
            pm25 = value(d.pm25),
            pm10 = value(d.pm10),
            no2 = value(d.no2),
            co = value(d.co),
            o3 = value(d.o3),
        ),
        NarrativeKind::Health => format!(
            "Based on this air quality data: AQI: {aqi}, PM2.5: {pm25}, PM10: {pm10}.\n\
             Provide 3-4 specific health recommendations for residents today. \
             Include activity suggestions and timing. Be concise and actionable.",
            aqi = d.aqi,
            pm25 = value(d.pm25),
            pm10 = value(d.pm10),
        ),
        NarrativeKind::Policy => format!(
            "As an AI analyzing air pollution data for {location}: AQI: {aqi}, PM2.5: {pm25}, PM10: {pm10}, NO2: {no2}.\n\
             Suggest 2-3 specific policy interventions or measures that could help improve air quality. \
             Focus on practical, evidence-based actions.",
            aqi = d.aqi,
            pm25 = value(d.pm25),
            pm10 = value(d.pm10),
            no2 = value(d.no2),
        ),
    }
}
