//! AviationStack HTTP client.

use std::fmt;
use std::time::Duration;

use super::{parse_flights_payload, FlightProvider, ProviderError, ProviderResult, RawFlightRecord};
use crate::config::ProviderConfig;
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// Client for the AviationStack `/flights` endpoint.
#[derive(Clone)]
pub struct AviationStackClient {
    base_url: String,
    access_key: String,
    client: reqwest::Client,
}

impl fmt::Debug for AviationStackClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AviationStackClient")
            .field("base_url", &self.base_url)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

impl AviationStackClient {
    pub fn new(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let access_key = normalize_text_option(Some(access_key.into())).ok_or_else(|| {
            ProviderError::InvalidConfiguration("access key must not be empty".to_string())
        })?;

        Ok(Self {
            base_url,
            access_key,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Build a client when an access key is configured.
    ///
    /// Returns `Ok(None)` when no key is present, which disables the live
    /// provider entirely.
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Option<Self>> {
        let Some(access_key) = normalize_text_option(config.access_key.clone()) else {
            return Ok(None);
        };
        Self::new(config.base_url.clone(), access_key, config.timeout).map(Some)
    }

    async fn request_flights(&self, flight_iata: &str) -> ProviderResult<Vec<RawFlightRecord>> {
        let response = self
            .client
            .get(format!("{}/flights", self.base_url))
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("flight_iata", flight_iata),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status,
                body: compact_text(&body),
            });
        }

        let body = response.text().await?;
        parse_flights_payload(&body)
    }
}

impl FlightProvider for AviationStackClient {
    async fn fetch_flights(&self, flight_iata: &str) -> ProviderResult<Vec<RawFlightRecord>> {
        self.request_flights(flight_iata).await
    }
}

fn normalize_base_url(raw: String) -> ProviderResult<String> {
    let base = normalize_text_option(Some(raw)).ok_or_else(|| {
        ProviderError::InvalidConfiguration("base URL must not be empty".to_string())
    })?;
    if is_http_url(&base) {
        Ok(base.trim_end_matches('/').to_string())
    } else {
        Err(ProviderError::InvalidConfiguration(
            "base URL must include http:// or https://".to_string(),
        ))
    }
}
