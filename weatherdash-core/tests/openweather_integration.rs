//! Integration tests for OpenWeatherProvider using wiremock.

use std::sync::Arc;

use weatherdash_core::{
    FetchError, MemoryStore, OpenWeatherProvider, SearchHistory, WeatherIcon, WeatherProvider,
    fetch_all,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a current-weather payload
fn current_weather(name: &str, country: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "base": "stations",
        "main": {
            "temp": temp,
            "feels_like": temp - 1.3,
            "temp_min": temp - 2.0,
            "temp_max": temp + 1.5,
            "pressure": 1009,
            "humidity": 82
        },
        "visibility": 8000,
        "wind": { "speed": 4.63, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1_700_000_500,
        "sys": { "country": country, "sunrise": 1_699_990_000, "sunset": 1_700_024_000 },
        "timezone": 0,
        "id": 2643743,
        "name": name,
        "cod": 200
    })
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(serde_json::json!({
        "cod": "404",
        "message": "city not found"
    }))
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_endpoint(
        "TEST_KEY".to_string(),
        format!("{}/data/2.5/weather", server.uri()),
    )
}

#[tokio::test]
async fn test_fetch_maps_payload_with_full_precision() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "london"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather("London", "GB", 12.37)))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let snap = provider.fetch_weather("london").await.unwrap();

    assert_eq!(snap.city_name, "London");
    assert_eq!(snap.country_code, "GB");
    assert_eq!(snap.temperature_c, 12.37);
    assert_eq!(snap.humidity_pct, 82);
    assert_eq!(snap.clouds_pct, 75);
    assert_eq!(snap.wind_speed_ms, 4.63);
    assert_eq!(snap.pressure_hpa, 1009);
    assert_eq!(snap.visibility_m, 8000);
    assert_eq!(snap.condition_main, "Rain");
    assert_eq!(snap.condition_description, "light rain");
    assert_eq!(snap.sunrise_epoch_sec, 1_699_990_000);
    assert_eq!(snap.sunset_epoch_sec, 1_700_024_000);
    assert_eq!(snap.icon(), WeatherIcon::CloudRain);
}

#[tokio::test]
async fn test_fetch_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(not_found())
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_weather("Nowhereville").await.unwrap_err();

    match err {
        FetchError::NotFound { city, code, message } => {
            assert_eq!(city, "Nowhereville");
            assert_eq!(code, "404");
            assert_eq!(message, "city not found");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_other_cod_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_weather("London").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_non_json_body_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_weather("London").await.unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
    assert!(err.to_string().contains("invalid JSON"));
}

#[tokio::test]
async fn test_malformed_success_payload_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 200,
            "name": "London"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_weather("London").await.unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let mock_server = MockServer::start().await;
    let provider = provider_for(&mock_server);
    drop(mock_server);

    let err = provider.fetch_weather("London").await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn test_fetch_all_drops_failures_in_order() {
    let mock_server = MockServer::start().await;

    for (query, name, temp) in [("A", "Alpha", 1.0), ("C", "Gamma", 3.0)] {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_weather(name, "ZZ", temp)))
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "B"))
        .respond_with(not_found())
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let snaps = fetch_all(&provider, &["A", "B", "C"]).await;

    let names: Vec<_> = snaps.iter().map(|s| s.city_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Gamma"]);
}

#[tokio::test]
async fn test_history_dedups_on_returned_name() {
    let mock_server = MockServer::start().await;

    for query in ["paris", "Paris"] {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_weather("Paris", "FR", 17.0)))
            .mount(&mock_server)
            .await;
    }

    let provider = Arc::new(provider_for(&mock_server));
    let store = MemoryStore::new();
    let mut history = SearchHistory::load(provider, Box::new(store.clone()));

    history.record_search("paris").await.unwrap();
    let entries = history.record_search("Paris").await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].snapshot.city_name, "Paris");
    assert!(store.contains_key(weatherdash_core::HISTORY_KEY));
}
