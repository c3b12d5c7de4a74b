use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;

use flightcard_core::config::{AppConfig as CoreConfig, ConfigError};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub core: CoreConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("FLIGHTCARD_API_BIND_ADDR")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Invalid(format!(
                "FLIGHTCARD_API_BIND_ADDR must be a socket address, got {bind_addr}"
            ))
        })?;

        Ok(Self {
            bind_addr,
            core: CoreConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use flightcard_core::config::FailurePolicy;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        ApiConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn config_defaults_to_loopback() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(config.core.provider.access_key.is_none());
    }

    #[test]
    fn config_rejects_invalid_bind_addr() {
        let err = config_from(&[("FLIGHTCARD_API_BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("FLIGHTCARD_API_BIND_ADDR"));
    }

    #[test]
    fn config_passes_core_settings_through() {
        let config = config_from(&[
            ("FLIGHTCARD_API_BIND_ADDR", "0.0.0.0:9000"),
            ("FLIGHTCARD_REPORT_PROVIDER_FAILURES", "true"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.core.failure_policy, FailurePolicy::ReportFailures);
    }

    #[test]
    fn config_redacts_sensitive_debug_fields() {
        let config = config_from(&[("AVIATIONSTACK_API_KEY", "sensitive-access-key")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("sensitive-access-key"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
