use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{FetchError, WeatherSnapshot};

use super::WeatherProvider;

/// Current-weather endpoint of the free OpenWeather API.
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        tracing::debug!(city, endpoint = %self.endpoint, "Requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::network(city, format!("request failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::network(city, format!("failed to read body: {e}")))?;

        // The payload's `cod` decides found/not-found, whatever the HTTP status.
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            FetchError::network(
                city,
                format!(
                    "invalid JSON (status {status}): {e}; body: {}",
                    truncate_body(&body)
                ),
            )
        })?;

        let code = value
            .get("cod")
            .and_then(OwCode::from_value)
            .ok_or_else(|| FetchError::network(city, format!("response without 'cod' (status {status})")))?;

        if !code.is_found() {
            let message = value
                .get("message")
                .map(|m| match m.as_str() {
                    Some(s) => s.to_string(),
                    None => m.to_string(),
                })
                .unwrap_or_else(|| "no message".to_string());

            return Err(FetchError::NotFound {
                city: city.to_string(),
                code: code.to_string(),
                message,
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_value(value)
            .map_err(|e| FetchError::network(city, format!("unexpected payload shape: {e}")))?;

        Ok(parsed.into_snapshot())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city_query: &str) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(city_query).await
    }
}

/// `cod` is a number on success and usually a string on errors.
#[derive(Debug, Clone, PartialEq)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(OwCode::Number),
            serde_json::Value::String(s) => Some(OwCode::Text(s.clone())),
            _ => None,
        }
    }

    fn is_found(&self) -> bool {
        match self {
            OwCode::Number(n) => *n == 200,
            OwCode::Text(s) => s.trim() == "200",
        }
    }
}

impl std::fmt::Display for OwCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwCode::Number(n) => write!(f, "{n}"),
            OwCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: i32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    #[serde(default)]
    visibility: Option<u32>,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        let (condition_main, condition_description) = self
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description))
            .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string()));

        WeatherSnapshot {
            city_name: self.name,
            country_code: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            min_temperature_c: self.main.temp_min,
            max_temperature_c: self.main.temp_max,
            humidity_pct: self.main.humidity,
            clouds_pct: self.clouds.all,
            wind_speed_ms: self.wind.speed.max(0.0),
            pressure_hpa: self.main.pressure,
            visibility_m: self.visibility.unwrap_or(0),
            condition_main,
            condition_description,
            sunrise_epoch_sec: self.sys.sunrise,
            sunset_epoch_sec: self.sys.sunset,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
