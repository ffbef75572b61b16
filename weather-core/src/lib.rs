//! Core library for the weather proxy and the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com provider
//! - Shared domain models: the canonical conditions and the legacy wire body
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{ClientConfig, Config, ServerConfig};
pub use error::{CITY_NOT_FOUND, WeatherError};
pub use model::{CurrentConditions, ErrorBody, LegacyWeatherBody};
pub use provider::{WeatherApiProvider, WeatherProvider};
