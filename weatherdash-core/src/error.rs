use thiserror::Error;

/// Failure of a single lookup against the weather data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The data source answered, but could not resolve the city.
    #[error("City not found: '{city}' (code {code}: {message})")]
    NotFound {
        city: String,
        code: String,
        message: String,
    },

    /// Transport failure or a body that could not be decoded.
    #[error("Network error while fetching '{city}': {reason}")]
    Network { city: String, reason: String },
}

impl FetchError {
    pub(crate) fn network(city: &str, reason: impl std::fmt::Display) -> Self {
        FetchError::Network {
            city: city.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    /// The query string that failed.
    pub fn city(&self) -> &str {
        match self {
            FetchError::NotFound { city, .. } | FetchError::Network { city, .. } => city,
        }
    }
}

/// Persistence read/write failure. Never fatal for history operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}
