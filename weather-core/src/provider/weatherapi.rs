use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{CurrentConditions, WeatherError};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server in tests.
    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self, WeatherError> {
        let http = Client::builder().build()?;

        Ok(Self {
            // An empty key is as good as none.
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("API key missing, refusing lookup for {city:?}");
            return Err(WeatherError::MissingApiKey);
        };

        let url = format!("{}/v1/current.json", self.base_url);
        debug!("calling WeatherAPI.com for {city:?}");

        let res = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        info!(status = status.as_u16(), "WeatherAPI.com responded");

        if !status.is_success() {
            let message = upstream_error_message(&body);
            warn!(status = status.as_u16(), ?message, "WeatherAPI.com rejected lookup");
            return Err(WeatherError::Upstream { status: status.as_u16(), message });
        }

        let parsed: WeatherApiCurrent = serde_json::from_str(&body)?;
        info!("weather data retrieved for {}", parsed.location.name);

        Ok(parsed.into())
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        self.fetch_current(city).await
    }
}

/// Pull `error.message` out of an error body. Bodies that are not JSON, or carry no
/// message, yield `None` so the caller falls back to the generic not-found text.
fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorBody>(body).ok()?.error?.message
}

/// Response of `GET /v1/current.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiCurrent {
    pub location: WaLocation,
    pub current: WaCurrent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaLocation {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaCondition {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaCurrent {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: u8,
    pub pressure_mb: f64,
    pub wind_kph: f64,
    pub vis_km: f64,
    pub condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: Option<WaErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: Option<String>,
}

impl From<WeatherApiCurrent> for CurrentConditions {
    fn from(wa: WeatherApiCurrent) -> Self {
        Self {
            name: wa.location.name,
            country: wa.location.country,
            temperature: wa.current.temp_c,
            feels_like: wa.current.feelslike_c,
            humidity: wa.current.humidity,
            pressure: wa.current.pressure_mb,
            condition_text: wa.current.condition.text,
            wind_speed_meters_per_second: wa.current.wind_kph / 3.6,
            visibility_meters: wa.current.vis_km * 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_json() -> serde_json::Value {
        serde_json::json!({
            "location": { "name": "London", "country": "United Kingdom", "region": "City of London" },
            "current": {
                "temp_c": 15.0,
                "feelslike_c": 13.0,
                "humidity": 70,
                "pressure_mb": 1012.0,
                "condition": { "text": "Cloudy", "code": 1006 },
                "wind_kph": 18.0,
                "vis_km": 10.0
            }
        })
    }

    #[tokio::test]
    async fn converts_units_and_renames_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("key", "test_key"))
            .and(query_param("q", "London"))
            .and(query_param("aqi", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            WeatherApiProvider::with_base_url(Some("test_key".into()), &mock_server.uri()).unwrap();
        let conditions = provider.current_conditions("London").await.unwrap();

        assert_eq!(conditions.name, "London");
        assert_eq!(conditions.country, "United Kingdom");
        assert_eq!(conditions.temperature, 15.0);
        assert_eq!(conditions.feels_like, 13.0);
        assert_eq!(conditions.humidity, 70);
        assert_eq!(conditions.pressure, 1012.0);
        assert_eq!(conditions.condition_text, "Cloudy");
        assert_eq!(conditions.wind_speed_meters_per_second, 5.0);
        assert_eq!(conditions.visibility_meters, 10.0 * 1000.0);
    }

    #[tokio::test]
    async fn city_is_url_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("q", "São Paulo & co"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            WeatherApiProvider::with_base_url(Some("k".into()), &mock_server.uri()).unwrap();
        assert!(provider.current_conditions("São Paulo & co").await.is_ok());
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_json()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = WeatherApiProvider::with_base_url(None, &mock_server.uri()).unwrap();
        let err = provider.current_conditions("London").await.unwrap_err();

        assert_eq!(err, WeatherError::MissingApiKey);
    }

    #[tokio::test]
    async fn empty_key_counts_as_missing() {
        let provider = WeatherApiProvider::new(Some(String::new())).unwrap();
        assert!(!provider.has_api_key());

        let err = provider.current_conditions("London").await.unwrap_err();
        assert_eq!(err, WeatherError::MissingApiKey);
    }

    #[tokio::test]
    async fn upstream_error_message_passes_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&mock_server)
            .await;

        let provider =
            WeatherApiProvider::with_base_url(Some("k".into()), &mock_server.uri()).unwrap();
        let err = provider.current_conditions("Atlantis").await.unwrap_err();

        assert_eq!(
            err,
            WeatherError::Upstream {
                status: 400,
                message: Some("No matching location found.".into())
            }
        );
    }

    #[tokio::test]
    async fn upstream_error_without_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(serde_json::json!({ "error": {} })),
            )
            .mount(&mock_server)
            .await;

        let provider =
            WeatherApiProvider::with_base_url(Some("k".into()), &mock_server.uri()).unwrap();
        let err = provider.current_conditions("London").await.unwrap_err();

        assert_eq!(err, WeatherError::Upstream { status: 403, message: None });
        assert_eq!(err.to_string(), "City not found");
    }

    #[tokio::test]
    async fn non_json_error_body_is_still_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let provider =
            WeatherApiProvider::with_base_url(Some("k".into()), &mock_server.uri()).unwrap();
        let err = provider.current_conditions("London").await.unwrap_err();

        assert_eq!(err, WeatherError::Upstream { status: 502, message: None });
    }

    #[tokio::test]
    async fn malformed_success_body_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider =
            WeatherApiProvider::with_base_url(Some("k".into()), &mock_server.uri()).unwrap();
        let err = provider.current_conditions("London").await.unwrap_err();

        assert!(matches!(err, WeatherError::Transport(_)));
        assert!(err.to_string().starts_with("Server error: "));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let provider =
            WeatherApiProvider::with_base_url(Some("secret_key".into()), "http://127.0.0.1:9")
                .unwrap();
        let err = provider.current_conditions("London").await.unwrap_err();

        assert!(err.to_string().starts_with("Server error: "));
        assert!(!err.to_string().contains("secret_key"));
    }
}
