use serde::{Deserialize, Serialize};

use crate::icon::WeatherIcon;

/// One successful current-weather reading for a city.
///
/// Temperatures keep full precision; rounding is left to whoever renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Canonical name as returned by the data source (may differ from the query).
    pub city_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub humidity_pct: u8,
    pub clouds_pct: u8,
    pub wind_speed_ms: f64,
    pub pressure_hpa: i32,
    pub visibility_m: u32,
    /// Category such as "Clear" or "Rain"; drives icon selection.
    pub condition_main: String,
    pub condition_description: String,
    pub sunrise_epoch_sec: i64,
    pub sunset_epoch_sec: i64,
}

impl WeatherSnapshot {
    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::for_condition(&self.condition_main)
    }

    /// Case-insensitive comparison on the canonical city name.
    pub fn is_same_city(&self, other_name: &str) -> bool {
        self.city_name.to_lowercase() == other_name.to_lowercase()
    }
}

/// A snapshot captured by a manual search, stamped with the local time of the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
    /// Fixed at insertion, never re-derived.
    pub searched_at_local: String,
}

#[cfg(test)]
pub(crate) fn sample_snapshot(city: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        city_name: city.to_string(),
        country_code: "XX".to_string(),
        temperature_c: 21.6,
        feels_like_c: 20.4,
        min_temperature_c: 18.2,
        max_temperature_c: 24.9,
        humidity_pct: 55,
        clouds_pct: 20,
        wind_speed_ms: 3.6,
        pressure_hpa: 1013,
        visibility_m: 10_000,
        condition_main: "Clear".to_string(),
        condition_description: "clear sky".to_string(),
        sunrise_epoch_sec: 1_700_000_000,
        sunset_epoch_sec: 1_700_040_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_city_ignores_case() {
        let snap = sample_snapshot("São Paulo");
        assert!(snap.is_same_city("são paulo"));
        assert!(snap.is_same_city("SÃO PAULO"));
        assert!(!snap.is_same_city("Sao Paulo"));
    }

    #[test]
    fn history_entry_serializes_flat() {
        let entry = HistoryEntry {
            snapshot: sample_snapshot("Paris"),
            searched_at_local: "09:15 AM".to_string(),
        };

        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["city_name"], "Paris");
        assert_eq!(json["searched_at_local"], "09:15 AM");
        assert!(json.get("snapshot").is_none());
    }
}
