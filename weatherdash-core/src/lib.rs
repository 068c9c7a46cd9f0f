//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather provider abstraction and its OpenWeather implementation
//! - The recent-search history and its persistence
//! - Concurrent lookup of the global cities overview
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod history;
pub mod icon;
pub mod model;
pub mod provider;
pub mod store;

pub use aggregator::fetch_all;
pub use config::Config;
pub use error::{FetchError, StorageError};
pub use history::{HISTORY_CAPACITY, HISTORY_KEY, RecentSearches, SearchHistory};
pub use icon::WeatherIcon;
pub use model::{HistoryEntry, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use store::{FileStore, KeyValueStore, MemoryStore};
