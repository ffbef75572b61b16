//! HTTP proxy in front of WeatherAPI.com.
//!
//! Exposes `GET /` and `GET /api/weather/{city}`; the latter answers with the
//! legacy nested body the existing clients understand.

pub mod api;
pub mod web;

pub use api::{ApiError, AppState};
pub use web::{app, run};
