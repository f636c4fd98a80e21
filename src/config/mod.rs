//! AeroSense configuration: TOML file, environment overrides, and secrets.
//!
//! Loading order is defaults → `config.toml` → `AEROSENSE_*` environment
//! variables. API keys never come from the file; they are read once from the
//! process environment into [`Secrets`] and checked per request by the
//! providers, so a missing key fails a request rather than startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const OPENWEATHER_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub upstream: UpstreamConfig,
    pub openweather: OpenWeatherConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Unset means requests may run for as long as the upstreams take.
    pub request_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
            max_body_bytes: 64 * 1024,
            request_timeout_secs: None,
        }
    }
}

/// Settings for the shared outbound HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("AeroSense/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub base_url: String,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-pro".into(),
            temperature: 0.7,
            max_output_tokens: 300,
        }
    }
}

impl Config {
    /// Load configuration. An explicit `path` must exist; the default
    /// location is optional and falls back to built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(raw) => {
                let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
                Self::from_file(&expanded)?
            }
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `AEROSENSE_HOST` / `AEROSENSE_PORT`. `lookup` is injected so
    /// tests don't have to touch the real process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("AEROSENSE_HOST").filter(|h| !h.trim().is_empty()) {
            self.gateway.host = host.trim().to_string();
        }
        if let Some(port) = lookup("AEROSENSE_PORT").filter(|p| !p.trim().is_empty()) {
            self.gateway.port = port
                .trim()
                .parse()
                .with_context(|| format!("AEROSENSE_PORT is not a valid port: {port}"))?;
        }
        Ok(())
    }
}

/// `<platform config dir>/aerosense/config.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "aerosense")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

// ── Secrets ───────────────────────────────────────────────────────────────────

/// Upstream API keys, captured once at process start.
#[derive(Clone, Default)]
pub struct Secrets {
    pub openweather_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            openweather_api_key: read(OPENWEATHER_KEY_VAR),
            gemini_api_key: read(GEMINI_KEY_VAR),
        }
    }
}

// Keys must never reach logs through a stray `{:?}`.
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("openweather_api_key", &mark(&self.openweather_api_key))
            .field("gemini_api_key", &mark(&self.gemini_api_key))
            .finish()
    }
}
