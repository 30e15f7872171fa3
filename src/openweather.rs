use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::weather::{self, ForecastEntry, WeatherSnapshot};

pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const ICON_URL: &str = "https://openweathermap.org/img/wn";
const USER_AGENT: &str = "wxboard";

/// Provider-hosted icon for an icon id such as `04d`
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL}/{icon}@2x.png")
}

pub mod current {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Current {
        pub name: Option<String>,

        pub main: Option<Main>,

        #[serde(default)]
        pub weather: Vec<Weather>,

        pub sys: Option<Sys>,

        pub wind: Option<Wind>,

        /// Shift in seconds from UTC
        #[serde(default)]
        pub timezone: i64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: f64,
        pub pressure: f64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Weather {
        pub main: String,
        pub description: String,
        pub icon: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Sys {
        pub sunrise: i64,
        pub sunset: i64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Wind {
        pub speed: f64,
    }
}

pub mod forecast {
    use super::*;

    /// 3-hour step, 5 day forecast
    #[derive(Deserialize, Debug)]
    pub struct Forecast {
        pub list: Vec<Item>,

        pub city: Option<City>,
    }

    #[derive(Deserialize, Debug)]
    pub struct City {
        #[serde(default)]
        pub timezone: i64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Item {
        pub dt: i64,

        pub main: ItemMain,

        pub wind: Option<current::Wind>,

        #[serde(default)]
        pub weather: Vec<Icon>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ItemMain {
        pub temp: f64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Icon {
        pub icon: Option<String>,
    }
}

/// What to look up current conditions for
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    Coords { lat: f64, lon: f64 },
    City(String),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Coords { lat, lon } => write!(f, "({lat}, {lon})"),
            Query::City(city) => write!(f, "{city:?}"),
        }
    }
}

/// Which endpoint a request went to, for error messages
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Weather,
    Forecast,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Weather => f.write_str("weather"),
            Endpoint::Forecast => f.write_str("forecast"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("City not found")]
    NotFound,

    #[error("Failed to fetch {endpoint} data (HTTP {status})")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("Failed to reach the weather service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid {endpoint} data: {reason}")]
    Malformed { endpoint: Endpoint, reason: String },
}

impl FetchError {
    /// Malformed responses are only logged, everything else is shown
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, FetchError::Malformed { .. })
    }
}

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Current conditions by coordinates or city name. A 404 means the city
    /// is unknown to the provider.
    pub async fn current(&self, query: &Query) -> Result<WeatherSnapshot, FetchError> {
        let mut params = match query {
            Query::Coords { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
            Query::City(city) => vec![("q", city.clone())],
        };
        params.push(("units", "metric".to_string()));

        let response = self.get("weather", &params).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        let data: current::Current = parse(response, Endpoint::Weather).await?;
        WeatherSnapshot::try_from(data).map_err(|err| FetchError::Malformed {
            endpoint: Endpoint::Weather,
            reason: err.to_string(),
        })
    }

    /// Multi-day forecast for a city, as echoed back by [Self::current]
    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
        let params = [("q", city.to_string()), ("units", "metric".to_string())];
        let response = self.get("forecast", &params).await?;
        let data: forecast::Forecast = parse(response, Endpoint::Forecast).await?;
        Ok(weather::forecast_entries(data))
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Response, FetchError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, ?params, "Requesting");
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", &self.api_key)])
            .send()
            .await?;
        Ok(response)
    }
}

async fn parse<T: DeserializeOwned>(
    response: Response,
    endpoint: Endpoint,
) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| FetchError::Malformed {
        endpoint,
        reason: err.to_string(),
    })
}
