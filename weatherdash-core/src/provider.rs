use crate::{Config, FetchError, WeatherSnapshot, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current weather, one city per call.
///
/// Implementations never panic or leak transport errors: every failure is
/// folded into a [`FetchError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city_query: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.require_api_key()?;
    Ok(OpenWeatherProvider::with_endpoint(
        api_key.to_owned(),
        config.endpoint.clone(),
    ))
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Canned responses keyed by lowercased query. Unknown queries are "not found".
    #[derive(Debug, Default)]
    pub(crate) struct StubProvider {
        responses: Mutex<HashMap<String, Result<WeatherSnapshot, FetchError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubProvider {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// `query` resolves to `snapshot` (whose name may differ from the query).
        pub(crate) fn with(self, query: &str, snapshot: WeatherSnapshot) -> Self {
            self.set(query, Ok(snapshot));
            self
        }

        pub(crate) fn with_error(self, query: &str, err: FetchError) -> Self {
            self.set(query, Err(err));
            self
        }

        pub(crate) fn set(&self, query: &str, response: Result<WeatherSnapshot, FetchError>) {
            self.responses.lock().insert(query.to_lowercase(), response);
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch_weather(&self, city_query: &str) -> Result<WeatherSnapshot, FetchError> {
            self.calls.lock().push(city_query.to_string());
            tokio::task::yield_now().await;

            self.responses
                .lock()
                .get(&city_query.to_lowercase())
                .cloned()
                .unwrap_or_else(|| {
                    Err(FetchError::NotFound {
                        city: city_query.to_string(),
                        code: "404".to_string(),
                        message: "city not found".to_string(),
                    })
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_uses_configured_endpoint() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.endpoint = "http://localhost:1234/weather".to_string();

        let provider = provider_from_config(&cfg).expect("provider");
        assert_eq!(provider.endpoint(), "http://localhost:1234/weather");
    }
}
