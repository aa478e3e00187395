/*
 *  forecast.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Forecast source: point lookup then period forecast
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::{debug, info};
use mini_moka::sync::Cache;
use reqwest::{Client, header};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::ForecastConfig;
use crate::constants::{
    ENDPOINT_CACHE_SIZE, FORECAST_BASE_URL, FORECAST_CONNECT_TIMEOUT_MS, FORECAST_TIMEOUT_MS,
};

/// Errors surfaced by a forecast source. The aggregator catches these per city.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid coordinates: {0}, {1}")]
    InvalidCoordinates(f64, f64),
    #[error("Missing forecast data: {0}")]
    MissingData(String),
    #[error("Forecast has {found} periods, {needed} needed")]
    MissingPeriods { found: usize, needed: usize },
    #[error("Invalid client configuration: {0}")]
    Config(String),
    #[error("Forecast task failed: {0}")]
    Task(String),
}

/// The slice of a forecast period the board reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPeriod {
    pub is_daytime: bool,
    /// degrees Fahrenheit
    pub temperature: i32,
    pub icon: String,
}

/// Where forecasts come from.
///
/// `resolve_endpoint` turns a coordinate into something `fetch_periods` can
/// load; periods come back in chronological order.
pub trait ForecastSource: Send + Sync + 'static {
    fn resolve_endpoint(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<String, ForecastError>> + Send;

    fn fetch_periods(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Vec<ForecastPeriod>, ForecastError>> + Send;
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    is_daytime: bool,
    temperature: Option<f64>,
    #[serde(default)]
    icon: Option<String>,
}

/// Pull the forecast endpoint out of a points response body.
pub fn parse_point(body: &str) -> Result<String, ForecastError> {
    let point: PointResponse = serde_json::from_str(body)?;
    point
        .properties
        .forecast
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ForecastError::MissingData("points response has no forecast link".to_string()))
}

/// Pull the periods out of a forecast response body.
pub fn parse_periods(body: &str) -> Result<Vec<ForecastPeriod>, ForecastError> {
    let forecast: ForecastResponse = serde_json::from_str(body)?;
    forecast
        .properties
        .periods
        .into_iter()
        .enumerate()
        .map(|(idx, p)| {
            let temperature = p
                .temperature
                .ok_or_else(|| ForecastError::MissingData(format!("period {} has no temperature", idx)))?;
            Ok(ForecastPeriod {
                is_daytime: p.is_daytime,
                temperature: temperature.round() as i32,
                icon: p.icon.unwrap_or_default(),
            })
        })
        .collect()
}

/// weather.gov client. Point lookups are cached, the mapping from a point to
/// its forecast grid does not change between refreshes.
#[derive(Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
    endpoints: Cache<String, String>,
}

impl NwsClient {
    pub fn new(config: Option<&ForecastConfig>) -> Result<Self, ForecastError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

        let defaults = ForecastConfig::default();
        let config = config.unwrap_or(&defaults);

        let user_agent = config.user_agent.clone().unwrap_or_else(|| VERSION.to_string());
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&user_agent)
                .map_err(|e| ForecastError::Config(format!("bad user agent {:?}: {}", user_agent, e)))?,
        );
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/geo+json"));

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms.unwrap_or(FORECAST_CONNECT_TIMEOUT_MS)))
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms.unwrap_or(FORECAST_TIMEOUT_MS)))
            .build()?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| FORECAST_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        info!("Forecast client using {}", base_url);

        Ok(Self {
            client,
            base_url,
            endpoints: Cache::new(config.endpoint_cache_size.unwrap_or(ENDPOINT_CACHE_SIZE)),
        })
    }

    fn point_key(latitude: f64, longitude: f64) -> String {
        // the points api only honours four decimals
        format!("{:.4},{:.4}", latitude, longitude)
    }

    async fn get_text(&self, url: &str) -> Result<String, ForecastError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()? // none 2xx raise
            .text()
            .await?;
        Ok(body)
    }
}

impl ForecastSource for NwsClient {
    async fn resolve_endpoint(&self, latitude: f64, longitude: f64) -> Result<String, ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidCoordinates(latitude, longitude));
        }
        let key = Self::point_key(latitude, longitude);
        if let Some(endpoint) = self.endpoints.get(&key) {
            debug!("Point {} resolved from cache", key);
            return Ok(endpoint);
        }

        let body = self.get_text(&format!("{}/points/{}", self.base_url, key)).await?;
        let endpoint = parse_point(&body)?;
        self.endpoints.insert(key, endpoint.clone());
        Ok(endpoint)
    }

    async fn fetch_periods(&self, endpoint: &str) -> Result<Vec<ForecastPeriod>, ForecastError> {
        let body = self.get_text(endpoint).await?;
        parse_periods(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST_BODY: &str = r#"{
        "properties": {
            "periods": [
                {"number": 1, "name": "Tonight", "isDaytime": false, "temperature": 48,
                 "icon": "https://api.weather.gov/icons/land/night/few?size=medium"},
                {"number": 2, "name": "Tuesday", "isDaytime": true, "temperature": 71.6,
                 "icon": "https://api.weather.gov/icons/land/day/sct?size=medium"},
                {"number": 3, "name": "Tuesday Night", "isDaytime": false, "temperature": 50}
            ]
        }
    }"#;

    #[test]
    fn test_parse_periods() {
        let periods = parse_periods(FORECAST_BODY).unwrap();
        assert_eq!(periods.len(), 3);
        assert!(!periods[0].is_daytime);
        assert_eq!(periods[1].temperature, 72);
        assert!(periods[1].icon.contains("/day/sct"));
        assert_eq!(periods[2].icon, "");
    }

    #[test]
    fn test_parse_periods_missing_temperature() {
        let body = r#"{"properties":{"periods":[{"isDaytime":true,"temperature":null}]}}"#;
        assert!(matches!(parse_periods(body), Err(ForecastError::MissingData(_))));
    }

    #[test]
    fn test_parse_point() {
        let body = r#"{"properties":{"forecast":"https://api.weather.gov/gridpoints/BOU/62,60/forecast"}}"#;
        assert_eq!(parse_point(body).unwrap(), "https://api.weather.gov/gridpoints/BOU/62,60/forecast");

        let missing = r#"{"properties":{"forecast":null}}"#;
        assert!(matches!(parse_point(missing), Err(ForecastError::MissingData(_))));
        assert!(matches!(parse_point("not json"), Err(ForecastError::Json(_))));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected_without_request() {
        let client = NwsClient::new(None).unwrap();
        let result = client.resolve_endpoint(123.0, 0.0).await;
        assert!(matches!(result, Err(ForecastError::InvalidCoordinates(_, _))));
    }

    #[test]
    fn test_bad_user_agent_is_a_config_error() {
        let config = ForecastConfig { user_agent: Some("board\nv1".to_string()), ..ForecastConfig::default() };
        assert!(matches!(NwsClient::new(Some(&config)), Err(ForecastError::Config(_))));
    }

    #[tokio::test]
    async fn test_cached_point_skips_network() {
        let client = NwsClient::new(None).unwrap();
        client.endpoints.insert(NwsClient::point_key(39.7391, -104.9847), "cached".to_string());
        assert_eq!(client.resolve_endpoint(39.7391, -104.9847).await.unwrap(), "cached");
    }
}
