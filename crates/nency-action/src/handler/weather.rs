//! weatherapi.com current-conditions client.

use std::time::Duration;

use async_trait::async_trait;
use nency_core::config::WeatherConfig;
use serde::Deserialize;

use crate::error::ActionError;
use crate::handler::WeatherService;
use crate::types::{Collaborator, WeatherReport};

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Option<Location>,
    current: Option<Current>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    temp_f: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    message: String,
}

/// Weather service backed by weatherapi.com.
pub struct WeatherApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl WeatherApiClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, ActionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ActionError::external(Collaborator::Weather, e))?;

        Ok(Self {
            http,
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }
}

/// Turn a weatherapi.com body into a report.
///
/// The service answers unknown locations with an `error` object (code 1006),
/// which maps to [`ActionError::NotFound`].
pub fn parse_report(city: &str, body: &str) -> Result<WeatherReport, ActionError> {
    let parsed: CurrentResponse = serde_json::from_str(body)
        .map_err(|e| ActionError::external(Collaborator::Weather, e))?;

    if let Some(err) = parsed.error {
        tracing::debug!(code = err.code, message = %err.message, "Weather API error body");
        return Err(ActionError::NotFound(city.to_string()));
    }

    match (parsed.location, parsed.current) {
        (Some(location), Some(current)) => Ok(WeatherReport {
            location: location.name,
            country: location.country,
            temp_c: current.temp_c,
            temp_f: current.temp_f,
            condition: current.condition.text,
        }),
        _ => Err(ActionError::NotFound(city.to_string())),
    }
}

#[async_trait]
impl WeatherService for WeatherApiClient {
    async fn current(&self, city: &str) -> Result<WeatherReport, ActionError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ActionError::InvalidPayload(
                "city must not be empty".to_string(),
            ));
        }
        if self.api_key.is_empty() {
            return Err(ActionError::Unavailable(Collaborator::Weather));
        }

        let url = format!("{}/v1/current.json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|e| ActionError::from_http(Collaborator::Weather, e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ActionError::from_http(Collaborator::Weather, e, self.timeout_secs))?;

        // 400 carries the "No matching location" error object.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            tracing::warn!(status = %status, city = %city, "Weather request rejected");
            return Err(ActionError::external(
                Collaborator::Weather,
                format!("HTTP {}", status),
            ));
        }

        let report = parse_report(city, &body)?;
        tracing::info!(city = %city, location = %report.location, "Weather fetched");
        Ok(report)
    }
}
