use serde::{Deserialize, Serialize};

/// Current conditions for one location, independent of any provider's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub condition_text: String,
    pub wind_speed_meters_per_second: f64,
    pub visibility_meters: f64,
}

/// Body emitted by `/api/weather/{city}`.
///
/// The nesting mirrors the OpenWeather response the first client was written against,
/// so field names here are a wire contract and must not drift with [`CurrentConditions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyWeatherBody {
    pub name: String,
    pub sys: LegacySys,
    pub main: LegacyMain,
    pub weather: Vec<LegacyCondition>,
    pub wind: LegacyWind,
    pub visibility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySys {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyCondition {
    pub description: String,
    pub main: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyWind {
    pub speed: f64,
}

impl From<&CurrentConditions> for LegacyWeatherBody {
    fn from(c: &CurrentConditions) -> Self {
        Self {
            name: c.name.clone(),
            sys: LegacySys { country: c.country.clone() },
            main: LegacyMain {
                temp: c.temperature,
                feels_like: c.feels_like,
                humidity: c.humidity,
                pressure: c.pressure,
            },
            weather: vec![LegacyCondition {
                description: c.condition_text.clone(),
                main: c.condition_text.clone(),
            }],
            wind: LegacyWind { speed: c.wind_speed_meters_per_second },
            visibility: c.visibility_meters,
        }
    }
}

impl From<LegacyWeatherBody> for CurrentConditions {
    fn from(body: LegacyWeatherBody) -> Self {
        let condition_text =
            body.weather.into_iter().next().map(|w| w.description).unwrap_or_default();

        Self {
            name: body.name,
            country: body.sys.country,
            temperature: body.main.temp,
            feels_like: body.main.feels_like,
            humidity: body.main.humidity,
            pressure: body.main.pressure,
            condition_text,
            wind_speed_meters_per_second: body.wind.speed,
            visibility_meters: body.visibility,
        }
    }
}

/// `{ "error": "..." }` body returned by the proxy on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> CurrentConditions {
        CurrentConditions {
            name: "London".into(),
            country: "United Kingdom".into(),
            temperature: 15.0,
            feels_like: 13.0,
            humidity: 70,
            pressure: 1012.0,
            condition_text: "Cloudy".into(),
            wind_speed_meters_per_second: 5.0,
            visibility_meters: 10_000.0,
        }
    }

    #[test]
    fn legacy_body_uses_nested_field_names() {
        let body = LegacyWeatherBody::from(&london());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["name"], "London");
        assert_eq!(json["sys"]["country"], "United Kingdom");
        assert_eq!(json["main"]["temp"].as_f64(), Some(15.0));
        assert_eq!(json["main"]["feels_like"].as_f64(), Some(13.0));
        assert_eq!(json["main"]["humidity"].as_u64(), Some(70));
        assert_eq!(json["main"]["pressure"].as_f64(), Some(1012.0));
        assert_eq!(json["weather"][0]["description"], "Cloudy");
        assert_eq!(json["weather"][0]["main"], "Cloudy");
        assert_eq!(json["wind"]["speed"].as_f64(), Some(5.0));
        assert_eq!(json["visibility"].as_f64(), Some(10_000.0));
    }

    #[test]
    fn legacy_body_maps_back_to_canonical() {
        let original = london();
        let back = CurrentConditions::from(LegacyWeatherBody::from(&original));
        assert_eq!(back, original);
    }

    #[test]
    fn empty_weather_array_gives_empty_condition() {
        let mut body = LegacyWeatherBody::from(&london());
        body.weather.clear();

        let conditions = CurrentConditions::from(body);
        assert_eq!(conditions.condition_text, "");
    }
}
