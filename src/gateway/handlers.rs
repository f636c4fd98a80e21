//! Request handlers for the two proxy endpoints.
//!
//! Bodies are taken as raw bytes and parsed here, so a malformed body turns
//! into the same `{ "error": ... }` shape as every other failure.

use super::AppState;
use crate::air_quality::AirQualityRequest;
use crate::error::ProxyError;
use crate::narrative::NarrativeBody;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error_response(status, self.to_string())
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn parse_body<T: serde::de::DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, Response> {
    let bytes = body.map_err(|rejection| error_response(rejection.status(), rejection.body_text()))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ProxyError::InvalidRequest(format!("Invalid JSON body: {e}")).into_response()
    })
}

/// POST /fetch-air-quality — relay the upstream air-pollution body as received.
pub async fn fetch_air_quality(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let span = tracing::info_span!("fetch_air_quality", request_id = %Uuid::new_v4());
    async move {
        let request: AirQualityRequest = match parse_body(body) {
            Ok(r) => r,
            Err(resp) => return resp,
        };
        let query = match request.into_query() {
            Ok(q) => q,
            Err(e) => return e.into_response(),
        };

        match state.providers.air_quality.resolve(&query).await {
            Ok(report) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                report.raw,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Error fetching air quality: {e}");
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// POST /generate-ai-summary — build the prompt, relay `{ "summary": ... }`.
pub async fn generate_ai_summary(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let span = tracing::info_span!("generate_ai_summary", request_id = %Uuid::new_v4());
    async move {
        let parsed: NarrativeBody = match parse_body(body) {
            Ok(b) => b,
            Err(resp) => return resp,
        };
        let request = match parsed.into_request() {
            Ok(r) => r,
            Err(e) => return e.into_response(),
        };

        match state.providers.narrative.generate(&request).await {
            Ok(summary) => (StatusCode::OK, Json(json!({ "summary": summary }))).into_response(),
            Err(e) => {
                tracing::error!("Error generating AI summary: {e}");
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_errors_become_json_with_mapped_status() {
        let resp = ProxyError::CityNotFound("Atlantis".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ProxyError::Configuration("GEMINI_API_KEY").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_json_is_a_bad_request() {
        let result: Result<AirQualityRequest, Response> = parse_body(Ok(Bytes::from_static(b"{not json")));
        let resp = result.unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
