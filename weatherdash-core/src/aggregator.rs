use futures::future::join_all;

use crate::{WeatherProvider, WeatherSnapshot};

/// Fetch every city concurrently and keep the successes, in input order.
///
/// Failed cities are logged and dropped; the call returns once every lookup
/// has settled.
pub async fn fetch_all<S: AsRef<str>>(
    provider: &dyn WeatherProvider,
    city_names: &[S],
) -> Vec<WeatherSnapshot> {
    let lookups = city_names
        .iter()
        .map(|city| provider.fetch_weather(city.as_ref()));

    let results = join_all(lookups).await;

    let snapshots: Vec<WeatherSnapshot> = results
        .into_iter()
        .filter_map(|result| match result {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(city = err.city(), error = %err, "Dropping city from global view");
                None
            }
        })
        .collect();

    tracing::debug!(
        requested = city_names.len(),
        received = snapshots.len(),
        "Global cities fetched"
    );

    snapshots
}
