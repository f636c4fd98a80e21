//! AeroSense — air-quality dashboard backend.
//!
//! - [`aqi`] classifies AQI categories for display
//! - [`air_quality`] and [`narrative`] are the two upstream proxies
//! - [`gateway`] serves them over HTTP
//! - [`dashboard`] holds the citizen / policymaker / landing view-models

pub mod air_quality;
pub mod aqi;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod narrative;
pub mod upstream;

pub use error::ProxyError;
