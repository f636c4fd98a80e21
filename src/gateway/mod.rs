//! HTTP gateway exposing both proxies.
//!
//! Routes:
//! - `POST /fetch-air-quality`   — air-quality proxy
//! - `POST /generate-ai-summary` — narrative proxy
//! - `OPTIONS`                   — CORS preflight, empty body
//! - `GET /health`
//!
//! Handlers hold no state beyond the shared providers, so concurrent
//! requests never observe each other.

pub mod handlers;

use crate::config::{Config, GatewayConfig};
use crate::upstream::Providers;
use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

/// Headers browsers may send on cross-origin calls to the proxies.
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Clone)]
pub struct AppState {
    pub providers: Providers,
}

pub fn router(state: AppState, config: &GatewayConfig) -> Router {
    let mut app = Router::new()
        .route("/fetch-air-quality", post(handlers::fetch_air_quality))
        .route("/generate-ai-summary", post(handlers::generate_ai_summary))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes));

    if let Some(secs) = config.request_timeout_secs {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(secs)));
    }

    // CORS wraps everything, so body-limit and timeout errors carry its headers too.
    app.layer(SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    ))
    .layer(cors_layer())
}

/// Any origin; OPTIONS is answered here with an empty 200.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: &Config, providers: Providers) -> Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind gateway on {addr}"))?;
    tracing::info!("AeroSense gateway listening on http://{addr}");

    let app = router(AppState { providers }, &config.gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
