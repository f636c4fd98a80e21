//! Error taxonomy shared by both proxies.
//!
//! Every failure a proxy can hit is a [`ProxyError`]. The gateway turns each
//! variant into a `{ "error": ... }` JSON body with the status returned by
//! [`ProxyError::status_code`]; nothing here is fatal to the process.

use thiserror::Error;

/// Which upstream service an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    AirPollution,
    Gemini,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Geocoding => write!(f, "Geocoding API"),
            Service::AirPollution => write!(f, "Air pollution API"),
            Service::Gemini => write!(f, "Gemini API"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required secret is absent. Fails the request, never the process.
    #[error("{0} not configured")]
    Configuration(&'static str),

    /// Geocoding returned an empty result set.
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// Non-success status or transport failure talking to an upstream.
    /// `status` is `None` when no response arrived at all.
    #[error("{service} error: {} - {body}", display_status(.status))]
    Upstream {
        service: Service,
        status: Option<u16>,
        body: String,
    },

    /// The upstream answered 2xx but the body was not what we expected.
    #[error("{service} returned an unreadable body: {message}")]
    Parse { service: Service, message: String },

    /// The caller's request body was malformed or incomplete.
    #[error("{0}")]
    InvalidRequest(String),
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "no response".to_string(), |s| s.to_string())
}

impl ProxyError {
    /// A request that produced no usable response. The request URL is
    /// dropped from the message since upstream keys travel in the query.
    pub fn transport(service: Service, err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let err = err.without_url();
        let mut body = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            body.push_str(": ");
            body.push_str(&cause.to_string());
            source = cause.source();
        }
        ProxyError::Upstream { service, status, body }
    }

    pub fn parse(service: Service, err: impl std::fmt::Display) -> Self {
        ProxyError::Parse {
            service,
            message: err.to_string(),
        }
    }

    /// HTTP status the gateway answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Configuration(_) => 500,
            ProxyError::CityNotFound(_) => 404,
            ProxyError::Upstream { .. } | ProxyError::Parse { .. } => 502,
            ProxyError::InvalidRequest(_) => 400,
        }
    }

    /// Parse failures count as upstream failures.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ProxyError::Upstream { .. } | ProxyError::Parse { .. })
    }

    /// Upstream status code, when one was received.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProxyError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message_names_the_secret() {
        let err = ProxyError::Configuration("GEMINI_API_KEY");
        assert_eq!(err.to_string(), "GEMINI_API_KEY not configured");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn gemini_upstream_message_carries_status_and_body() {
        let err = ProxyError::Upstream {
            service: Service::Gemini,
            status: Some(429),
            body: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "Gemini API error: 429 - quota exceeded");
        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn parse_is_an_upstream_failure() {
        let err = ProxyError::parse(Service::AirPollution, "expected value at line 1");
        assert!(err.is_upstream());
        assert_eq!(err.status_code(), 502);
        assert!(!ProxyError::CityNotFound("Atlantis".into()).is_upstream());
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(ProxyError::CityNotFound("Atlantis".into()).status_code(), 404);
        assert_eq!(ProxyError::InvalidRequest("bad".into()).status_code(), 400);
    }
}
