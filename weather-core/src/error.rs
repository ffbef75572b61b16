use thiserror::Error;

/// Message used when the upstream rejects a lookup without saying why.
pub const CITY_NOT_FOUND: &str = "City not found";

/// Everything a weather lookup can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// No provider credential configured. Raised before any network call.
    #[error("API key not configured")]
    MissingApiKey,

    /// The provider answered with a non-success status.
    #[error("{}", .message.as_deref().unwrap_or(CITY_NOT_FOUND))]
    Upstream { status: u16, message: Option<String> },

    /// Network failure or an unparseable success body.
    #[error("Server error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key; keep it out of messages.
        WeatherError::Transport(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}
