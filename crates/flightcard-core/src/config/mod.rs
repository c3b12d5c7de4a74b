//! Runtime configuration for the resolver and refresh scheduling.
//!
//! Values come from environment variables. Parsing goes through a lookup
//! closure so every rule can be exercised without touching the process env.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::util::is_http_url;

pub const DEFAULT_PROVIDER_BASE_URL: &str = "http://api.aviationstack.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What the resolver reports when the live provider failed and the fallback
/// dataset has no match either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report `NotFound`, hiding the provider failure.
    #[default]
    MaskFailures,
    /// Report `ResolutionFailed` so callers can show a connectivity message.
    ReportFailures,
}

/// Live provider settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// AviationStack access key. `None` disables the live provider.
    pub access_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ProviderConfig")
            .field(
                "access_key",
                &self.access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Timing policy for automatic and manual refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// How often staleness is re-evaluated
    pub tick_interval: Duration,
    /// Elapsed time after which a resolved flight is considered stale
    pub stale_after: Duration,
    /// Cool-down during which manual refresh requests are ignored
    pub throttle: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
            stale_after: Duration::from_secs(5 * 60),
            throttle: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub refresh: RefreshConfig,
    pub failure_policy: FailurePolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_key = optional_trimmed(&lookup, "AVIATIONSTACK_API_KEY");

        let base_url = value_or_default(&lookup, "AVIATIONSTACK_BASE_URL", DEFAULT_PROVIDER_BASE_URL);
        if !is_http_url(&base_url) {
            return Err(ConfigError::Invalid(
                "AVIATIONSTACK_BASE_URL must start with http:// or https://".to_string(),
            ));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout_secs = bounded_secs(&lookup, "FLIGHTCARD_HTTP_TIMEOUT_SECS", "10", 1, 120)?;

        let failure_policy =
            match value_or_default(&lookup, "FLIGHTCARD_REPORT_PROVIDER_FAILURES", "false")
                .to_ascii_lowercase()
                .as_str()
            {
                "true" | "1" | "yes" => FailurePolicy::ReportFailures,
                "false" | "0" | "no" => FailurePolicy::MaskFailures,
                _ => {
                    return Err(ConfigError::Invalid(
                        "FLIGHTCARD_REPORT_PROVIDER_FAILURES must be true or false".to_string(),
                    ))
                }
            };

        let tick_secs = bounded_secs(&lookup, "FLIGHTCARD_REFRESH_TICK_SECS", "30", 1, 3_600)?;
        let stale_secs = bounded_secs(&lookup, "FLIGHTCARD_STALE_AFTER_SECS", "300", 10, 86_400)?;
        let throttle_secs = bounded_secs(&lookup, "FLIGHTCARD_REFRESH_THROTTLE_SECS", "5", 0, 600)?;

        Ok(Self {
            provider: ProviderConfig {
                access_key,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            refresh: RefreshConfig {
                tick_interval: Duration::from_secs(tick_secs),
                stale_after: Duration::from_secs(stale_secs),
                throttle: Duration::from_secs(throttle_secs),
            },
            failure_policy,
        })
    }
}

fn bounded_secs(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
    min: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let value = value_or_default(lookup, name, default)
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(format!("{name} must be an integer in [{min}, {max}]")))?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be in [{min}, {max}]"
        )))
    }
}

pub(crate) fn value_or_default(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

pub(crate) fn optional_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
