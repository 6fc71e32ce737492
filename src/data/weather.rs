//! MET Norway locationforecast client
//!
//! This module fetches the `compact` forecast for a coordinate, shapes the
//! first timeseries step into a [`WeatherResult`], and keeps recent results
//! in a [`WeatherCache`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::forecast::{RawForecastResponse, StepData};
use super::units::{celsius_to_fahrenheit, floor_celsius, mps_to_kph, mps_to_mph};
use super::{Coordinate, Reading, Temperature, TemperatureUnit, WeatherResult, WindSpeed};
use crate::cache::{CacheKey, Clock, SystemClock, WeatherCache};

/// Base URL for the locationforecast 2.0 API
const MET_NO_BASE_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0";

/// Errors that can occur when fetching weather data
///
/// Cloneable so one failed fetch can be handed to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    /// The API answered with a non-success status; displays the status text
    #[error("{status_text}")]
    Http {
        status: StatusCode,
        status_text: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] Arc<reqwest::Error>),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[source] Arc<serde_json::Error>),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// The client could not be built from its configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::RequestFailed(Arc::new(err))
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::ParseError(Arc::new(err))
    }
}

impl WeatherError {
    /// Builds an `Http` error, preferring the reason phrase the server sent
    fn from_response(response: &Response) -> Self {
        // hyper only records the phrase when it differs from the standard one
        let sent = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok());

        match sent {
            Some(status_text) => WeatherError::Http {
                status: response.status(),
                status_text: status_text.to_string(),
            },
            None => Self::from_status(response.status()),
        }
    }

    fn from_status(status: StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        WeatherError::Http {
            status,
            status_text,
        }
    }
}

/// A fetch that every caller missing the same key awaits
type SharedFetch = Shared<BoxFuture<'static, Result<WeatherResult, WeatherError>>>;

/// Weather client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// API base URL, without the trailing product name
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// How long a fetched result is served from cache
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_minutes: u32,

    /// User-Agent sent with each request; MET Norway rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    MET_NO_BASE_URL.to_string()
}

const fn default_timeout() -> u64 {
    30
}

const fn default_cache_ttl() -> u32 {
    35
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            cache_ttl_minutes: default_cache_ttl(),
            user_agent: default_user_agent(),
        }
    }
}

impl WeatherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.cache_ttl_minutes))
    }
}

/// Client for current conditions from the locationforecast API
///
/// Results are cached per coordinate and unit preference. Concurrent lookups
/// that miss the cache for the same key share one request and its outcome,
/// success or failure.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    cache: WeatherCache,
    in_flight: Arc<Mutex<HashMap<CacheKey, SharedFetch>>>,
}

impl WeatherClient {
    /// Create a new WeatherClient with default settings
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_config(WeatherConfig::default())
    }

    /// Create a new WeatherClient from `config`, using the system clock
    pub fn with_config(config: WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_clock(config, SystemClock)
    }

    /// Create a new WeatherClient whose cache reads time from `clock`
    pub fn with_clock(
        config: WeatherConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WeatherError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: WeatherCache::with_clock(config.cache_ttl(), clock),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// The cache backing this client
    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Drops the cached result for a coordinate and unit preference
    pub fn invalidate(&self, coordinate: Coordinate, unit: Option<TemperatureUnit>) -> bool {
        self.cache.invalidate(&CacheKey::new(coordinate, unit))
    }

    /// Drops every cached result
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Current conditions in both Celsius and Fahrenheit
    ///
    /// The result has no `local`/`symbol` temperature fields.
    pub async fn get_weather(&self, coordinate: Coordinate) -> Result<WeatherResult, WeatherError> {
        self.lookup(CacheKey::new(coordinate, None)).await
    }

    /// Current conditions with an extra reading in the preferred unit
    pub async fn get_weather_with_unit(
        &self,
        coordinate: Coordinate,
        unit: TemperatureUnit,
    ) -> Result<WeatherResult, WeatherError> {
        self.lookup(CacheKey::new(coordinate, Some(unit))).await
    }

    /// Serves `key` from cache, or joins the fetch in flight for it
    async fn lookup(&self, key: CacheKey) -> Result<WeatherResult, WeatherError> {
        if let Some(result) = self.cache.get(&key) {
            debug!(location = %key.coordinate(), "Weather cache hit");
            return Ok(result);
        }

        let fetch = {
            let mut in_flight = self.in_flight.lock();
            // A fetch stores its result before leaving the map, so checking
            // again under the lock cannot miss one that just finished
            if let Some(result) = self.cache.get(&key) {
                debug!(location = %key.coordinate(), "Weather cache filled by a finished fetch");
                return Ok(result);
            }
            in_flight
                .entry(key)
                .or_insert_with(|| {
                    debug!(location = %key.coordinate(), "Weather cache miss");
                    self.start_fetch(key)
                })
                .clone()
        };

        fetch.await
    }

    /// Fetch for `key` that caches a success and leaves the in-flight map
    fn start_fetch(&self, key: CacheKey) -> SharedFetch {
        let client = self.clone();
        async move {
            let result = client.fetch_weather(key.coordinate(), key.unit()).await;
            if let Ok(weather) = &result {
                client.cache.insert(key, weather.clone());
            }
            client.in_flight.lock().remove(&key);
            result
        }
        .boxed()
        .shared()
    }

    /// Fetch and shape current conditions, bypassing the cache
    ///
    /// # Arguments
    /// * `coordinate` - Location to fetch
    /// * `unit` - Preferred unit, or `None` for the unit-agnostic shape
    ///
    /// # Returns
    /// * `Ok(WeatherResult)` - Conditions from the first timeseries step
    /// * `Err(WeatherError)` - If the request, status, or shape is bad
    #[instrument(skip(self), fields(lat = %coordinate.latitude, lon = %coordinate.longitude))]
    pub async fn fetch_weather(
        &self,
        coordinate: Coordinate,
        unit: Option<TemperatureUnit>,
    ) -> Result<WeatherResult, WeatherError> {
        let url = format!(
            "{}/compact?lat={}&lon={}",
            self.base_url, coordinate.latitude, coordinate.longitude
        );
        debug!(url = %url, "Fetching locationforecast");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Forecast request was not successful");
            return Err(WeatherError::from_response(&response));
        }

        let text = response.text().await?;
        let forecast: RawForecastResponse = serde_json::from_str(&text)?;

        shape_forecast(&forecast, unit)
    }
}

/// Shapes the first timeseries step of `forecast` into a `WeatherResult`
pub fn shape_forecast(
    forecast: &RawForecastResponse,
    unit: Option<TemperatureUnit>,
) -> Result<WeatherResult, WeatherError> {
    let data = forecast
        .current()
        .ok_or_else(|| WeatherError::MissingField("properties.timeseries[0].data".to_string()))?;

    shape_step(data, unit)
}

/// Derives readings from one forecast step
///
/// Each reading is derived on its own; a missing temperature does not stop
/// the wind readings and vice versa. Only the wind direction is required.
fn shape_step(data: &StepData, unit: Option<TemperatureUnit>) -> Result<WeatherResult, WeatherError> {
    let details = data.details();

    let wind_from_direction = details
        .and_then(|d| d.wind_from_direction)
        .ok_or_else(|| WeatherError::MissingField("wind_from_direction".to_string()))?;

    let celsius = details.and_then(|d| d.air_temperature).map(floor_celsius);
    let fahrenheit = celsius.map(celsius_to_fahrenheit);

    let wind_speed = details.and_then(|d| d.wind_speed);

    let temperature = Temperature::new(Reading::from(celsius), Reading::from(fahrenheit));
    let temperature = match unit {
        Some(unit) => temperature.in_unit(unit),
        None => temperature,
    };

    Ok(WeatherResult {
        symbol_code: data.next_hour_symbol().map(str::to_string),
        wind_from_direction,
        wind_speed: WindSpeed {
            kph: Reading::from(wind_speed.map(mps_to_kph)),
            mph: Reading::from(wind_speed.map(mps_to_mph)),
        },
        temperature,
    })
}
