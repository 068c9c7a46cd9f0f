use serde::{Deserialize, Serialize};

/// Icon shown next to a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sun,
    #[default]
    Cloud,
    CloudRain,
    Bolt,
    Snowflake,
    Smog,
}

impl WeatherIcon {
    /// Map a `weather[0].main` category to an icon. Unknown categories fall back to `Cloud`.
    pub fn for_condition(condition_main: &str) -> Self {
        match condition_main {
            "Clear" => Self::Sun,
            "Clouds" => Self::Cloud,
            "Rain" | "Drizzle" => Self::CloudRain,
            "Thunderstorm" => Self::Bolt,
            "Snow" => Self::Snowflake,
            "Mist" | "Smoke" | "Haze" | "Fog" => Self::Smog,
            _ => Self::default(),
        }
    }

    /// Font Awesome class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Sun => "fa-sun",
            Self::Cloud => "fa-cloud",
            Self::CloudRain => "fa-cloud-rain",
            Self::Bolt => "fa-bolt",
            Self::Snowflake => "fa-snowflake",
            Self::Smog => "fa-smog",
        }
    }

    /// Glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::Cloud => "☁",
            Self::CloudRain => "🌧",
            Self::Bolt => "⚡",
            Self::Snowflake => "❄",
            Self::Smog => "🌫",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}
