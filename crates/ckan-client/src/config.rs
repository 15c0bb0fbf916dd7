//! Client configuration
//!
//! [`ClientOptions`] controls how requests are made; [`ClientConfig`] pairs
//! it with a base URL and can be loaded from the environment.

use ckan_common::{CkanError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Portal used when `CKAN_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://demo.ckan.org";

pub const ENV_BASE_URL: &str = "CKAN_BASE_URL";
pub const ENV_SKIP_ENDPOINT_CORRECTION: &str = "CKAN_SKIP_ENDPOINT_CORRECTION";
pub const ENV_API_TIMEOUT_SECS: &str = "CKAN_API_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "CKAN_USER_AGENT";

/// Settings applied to every HTTP request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Whole-request timeout; none unless set
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    /// Extra headers, e.g. `Authorization` for private portals
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Build the HTTP client these options describe
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| CkanError::config(format!("Invalid header name '{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| CkanError::config(format!("Invalid value for header '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(builder.build()?)
    }
}

/// How the client talks to the portal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub request: RequestOptions,
    /// Use the base URL as given instead of rewriting it to `/api/3/action/`
    pub skip_endpoint_correction: bool,
}

/// Everything needed to construct a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub options: ClientOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            options: ClientOptions::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            options: ClientOptions::default(),
        }
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }

        if let Ok(skip) = std::env::var(ENV_SKIP_ENDPOINT_CORRECTION) {
            config.options.skip_endpoint_correction = parse_flag(ENV_SKIP_ENDPOINT_CORRECTION, &skip)?;
        }

        if let Ok(secs) = std::env::var(ENV_API_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                CkanError::config(format!("{} must be a whole number of seconds, got '{}'", ENV_API_TIMEOUT_SECS, secs))
            })?;
            config.options.request.timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(user_agent) = std::env::var(ENV_USER_AGENT) {
            config.options.request.user_agent = Some(user_agent);
        }

        Ok(config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CkanError::config(format!("{} must be a boolean, got '{}'", name, other))),
    }
}
