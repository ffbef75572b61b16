use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use weather_core::{CITY_NOT_FOUND, CurrentConditions, ErrorBody, LegacyWeatherBody};

/// Anything the view can ask for current conditions.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<CurrentConditions>;
}

/// Talks to the proxy server over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    base_url: Url,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| anyhow!("Invalid backend URL '{base_url}': {e}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid backend URL '{base_url}': not a base URL"));
        }

        Ok(Self { http: Client::new(), base_url })
    }

    /// `{base}/api/weather/{city}`, with the city percent-encoded as one path segment.
    fn weather_url(&self, city: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "weather", city]);
        }
        url
    }
}

#[async_trait]
impl WeatherSource for ProxyClient {
    async fn fetch(&self, city: &str) -> Result<CurrentConditions> {
        let res = self.http.get(self.weather_url(city)).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| CITY_NOT_FOUND.to_string());
            return Err(anyhow!(message));
        }

        let body: LegacyWeatherBody = res.json().await?;
        Ok(body.into())
    }
}
