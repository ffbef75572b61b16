use async_trait::async_trait;
use std::fmt::Debug;

use crate::{CurrentConditions, WeatherError, config::ServerConfig};

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

/// Source of current conditions for a free-text location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherError>;
}

/// Build the provider the server uses from its config section.
pub fn provider_from_config(config: &ServerConfig) -> Result<WeatherApiProvider, WeatherError> {
    WeatherApiProvider::with_base_url(config.api_key.clone(), &config.upstream_url)
}
