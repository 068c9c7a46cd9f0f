//! Recent-search history: bounded, deduplicated by canonical city name,
//! most-recent-first, persisted after every change.

use std::{fmt, sync::Arc};

use chrono::Local;

use crate::{
    FetchError, HistoryEntry, StorageError, WeatherProvider, WeatherSnapshot,
    store::KeyValueStore,
};

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 5;

/// Storage key holding the JSON-encoded list.
pub const HISTORY_KEY: &str = "recent_searches";

/// Produces the `searched_at_local` stamp for a new entry.
pub type Clock = Box<dyn Fn() -> String + Send + Sync>;

fn local_clock() -> String {
    Local::now().format("%I:%M %p").to_string()
}

/// The persisted list on its own, without a way to look cities up.
///
/// Enough for listing and clearing; new entries only arrive through
/// [`SearchHistory::record_search`].
pub struct RecentSearches {
    store: Box<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    clock: Clock,
}

impl fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecentSearches")
            .field("store", &self.store)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl RecentSearches {
    /// Restore the persisted list. A missing key, unreadable storage or a
    /// corrupt payload all yield an empty history.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = read_entries(store.as_ref());

        Self {
            store,
            entries,
            clock: Box::new(local_clock),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty the history and drop the persisted key. Calling it twice is harmless.
    pub fn clear(&mut self) {
        self.entries.clear();

        match self.store.remove(HISTORY_KEY) {
            Ok(()) => tracing::info!("Search history cleared"),
            Err(err) => tracing::warn!(error = %err, "Failed to remove persisted search history"),
        }
    }

    fn push_front(&mut self, snapshot: WeatherSnapshot) {
        let entry = HistoryEntry {
            searched_at_local: (self.clock)(),
            snapshot,
        };

        self.entries
            .retain(|existing| !existing.snapshot.is_same_city(&entry.snapshot.city_name));
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);

        if let Err(err) = write_entries(self.store.as_ref(), &self.entries) {
            tracing::warn!(error = %err, "Failed to persist search history");
        }
    }
}

/// Owner of the recent-search list plus the provider that feeds it.
///
/// Mutation goes through `record_search` and `clear` only, both of which take
/// `&mut self`; share it between tasks behind a mutex.
pub struct SearchHistory {
    provider: Arc<dyn WeatherProvider>,
    searches: RecentSearches,
}

impl fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchHistory")
            .field("provider", &self.provider)
            .field("searches", &self.searches)
            .finish()
    }
}

impl SearchHistory {
    /// Restore the persisted list, see [`RecentSearches::load`].
    pub fn load(provider: Arc<dyn WeatherProvider>, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            searches: RecentSearches::load(store),
        }
    }

    /// Replace the clock used to stamp new entries.
    pub fn with_clock(mut self, clock: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.searches.clock = Box::new(clock);
        self
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.searches.entries()
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    /// Fetch `city_query` and put the result at the front of the history.
    ///
    /// Any entry with the same canonical name (case-insensitive) is replaced,
    /// and the list is cut back to [`HISTORY_CAPACITY`]. On a failed lookup the
    /// history is left exactly as it was and the error is returned.
    ///
    /// Persisting is best-effort: a storage failure is logged and the
    /// in-memory history still reflects the search.
    pub async fn record_search(&mut self, city_query: &str) -> Result<&[HistoryEntry], FetchError> {
        let snapshot = match self.provider.fetch_weather(city_query).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(city = city_query, error = %err, "Lookup failed, history unchanged");
                return Err(err);
            }
        };

        if !snapshot.is_same_city(city_query) {
            tracing::debug!(
                query = city_query,
                canonical = %snapshot.city_name,
                "Data source returned a different canonical name"
            );
        }

        self.searches.push_front(snapshot);

        Ok(self.searches.entries())
    }

    /// See [`RecentSearches::clear`].
    pub fn clear(&mut self) {
        self.searches.clear();
    }

    /// Fresh lookup of a city for display. Does not touch the history.
    pub async fn select_entry(&self, city_name: &str) -> Result<WeatherSnapshot, FetchError> {
        self.provider.fetch_weather(city_name).await
    }
}

fn read_entries(store: &dyn KeyValueStore) -> Vec<HistoryEntry> {
    let raw = match store.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "Could not read search history, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
        Ok(mut entries) => {
            // Hand-edited files may break the invariants; keep the newest of each city.
            let mut seen: Vec<String> = Vec::with_capacity(entries.len());
            entries.retain(|entry| {
                let key = entry.snapshot.city_name.to_lowercase();
                if seen.contains(&key) {
                    false
                } else {
                    seen.push(key);
                    true
                }
            });
            entries.truncate(HISTORY_CAPACITY);
            entries
        }
        Err(err) => {
            tracing::warn!(error = %err, "Corrupt search history, starting empty");
            Vec::new()
        }
    }
}

fn write_entries(store: &dyn KeyValueStore, entries: &[HistoryEntry]) -> Result<(), StorageError> {
    let json = serde_json::to_string(entries).map_err(|source| StorageError::Serialize {
        key: HISTORY_KEY.to_string(),
        source,
    })?;
    store.set(HISTORY_KEY, &json)
}
