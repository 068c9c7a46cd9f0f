//! Plain-text rendering of snapshots, history and the global overview.

use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};
use weatherdash_core::{HistoryEntry, WeatherSnapshot};

/// Whole degrees, halves rounding up (so -2.5 becomes -2).
pub fn round_temp(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

pub fn visibility_km(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}

/// `HH:MM AM` in the given zone, or `--:--` for out-of-range timestamps.
pub fn clock_time<Tz>(epoch_sec: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(epoch_sec, 0)
        .map(|utc| utc.with_timezone(tz).format("%I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Dashboard clock line, e.g. `03:07 PM  Wed, Oct 14`.
pub fn header<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}  {}", now.format("%I:%M %p"), now.format("%a, %b %-d"))
}

pub fn main_weather(snap: &WeatherSnapshot) -> String {
    let icon = snap.icon();
    let mut out = String::new();

    let _ = writeln!(out, "{} {}, {}", icon.glyph(), snap.city_name, snap.country_code);
    let _ = writeln!(
        out,
        "   {}°C  {}",
        round_temp(snap.temperature_c),
        snap.condition_description
    );
    let _ = writeln!(
        out,
        "   Feels {}°C | Humidity {}% | Wind {} m/s",
        round_temp(snap.feels_like_c),
        snap.humidity_pct,
        snap.wind_speed_ms
    );

    out
}

pub fn details<Tz>(snap: &WeatherSnapshot, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rows = [
        ("Pressure", format!("{} hPa", snap.pressure_hpa)),
        ("Visibility", visibility_km(snap.visibility_m)),
        ("Clouds", format!("{}%", snap.clouds_pct)),
        ("Sunrise", clock_time(snap.sunrise_epoch_sec, tz)),
        ("Sunset", clock_time(snap.sunset_epoch_sec, tz)),
        (
            "Min/Max",
            format!(
                "{}°/{}°",
                round_temp(snap.min_temperature_c),
                round_temp(snap.max_temperature_c)
            ),
        ),
    ];

    rows.iter().fold(String::new(), |mut out, (label, value)| {
        let _ = writeln!(out, "   {label:<11}{value}");
        out
    })
}

pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent searches\n".to_string();
    }

    entries.iter().fold(String::new(), |mut out, entry| {
        let snap = &entry.snapshot;
        let _ = writeln!(
            out,
            "{} {:<18}{:>4}°C   {}",
            snap.icon().glyph(),
            snap.city_name,
            round_temp(snap.temperature_c),
            entry.searched_at_local
        );
        out
    })
}

pub fn global_cities(snaps: &[WeatherSnapshot]) -> String {
    if snaps.is_empty() {
        return "Failed to load\n".to_string();
    }

    snaps.iter().fold(String::new(), |mut out, snap| {
        let _ = writeln!(
            out,
            "{} {:<14}{:<4}{:>4}°C  {:>3}%  {} m/s",
            snap.icon().glyph(),
            snap.city_name,
            snap.country_code,
            round_temp(snap.temperature_c),
            snap.humidity_pct,
            snap.wind_speed_ms
        );
        out
    })
}
