use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tracing::{error, info, warn};
use weather_core::{ErrorBody, LegacyWeatherBody, WeatherError, WeatherProvider};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: impl WeatherProvider + 'static) -> Self {
        Self { provider: Arc::new(provider) }
    }
}

/// A [`WeatherError`] on its way out as `{ "error": "..." }`.
#[derive(Debug)]
pub struct ApiError(pub WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            WeatherError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            // Every upstream rejection is reported as not found, whatever its status.
            WeatherError::Upstream { .. } => StatusCode::NOT_FOUND,
            WeatherError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/weather/{city}", get(get_weather))
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Weather API Server is running!",
        "api": "WeatherAPI.com",
        "endpoints": {
            "weather": "/api/weather/:city",
            "example": "/api/weather/London"
        }
    }))
}

async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<LegacyWeatherBody>, ApiError> {
    info!("request received for city: {city}");

    match state.provider.current_conditions(&city).await {
        Ok(conditions) => Ok(Json(LegacyWeatherBody::from(&conditions))),
        Err(err) => {
            match &err {
                WeatherError::Transport(_) => error!("{err}"),
                _ => warn!("lookup for {city:?} failed: {err}"),
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        assert_eq!(ApiError(WeatherError::MissingApiKey).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError(WeatherError::Upstream { status: 500, message: None }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(WeatherError::Transport("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
