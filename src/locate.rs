//! Device location lookup. A terminal has no browser geolocation, so the
//! position comes from fixed coordinates or an IP geolocation service.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

pub const GEO_URL: &str = "http://ip-api.com/json";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

/// Why a location couldn't be determined. The first three carry the same
/// numeric codes as browser geolocation errors, which the logs record.
#[derive(Debug, Error, PartialEq)]
pub enum LocateError {
    #[error("Location access denied. Please enable it for live weather.")]
    PermissionDenied,

    #[error("Location unavailable. Try again later.")]
    PositionUnavailable,

    #[error("Location request timed out.")]
    Timeout,

    #[error("Geolocation is not supported on this system.")]
    Unsupported,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl LocateError {
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::PermissionDenied => Some(1),
            Self::PositionUnavailable => Some(2),
            Self::Timeout => Some(3),
            Self::Unsupported | Self::Unknown => None,
        }
    }
}

impl From<reqwest::Error> for LocateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Unknown
        } else {
            Self::PositionUnavailable
        }
    }
}

/// Something that can tell where the user is
pub trait Locator: Send + Sync {
    fn locate(&self) -> impl std::future::Future<Output = Result<Coords, LocateError>> + Send;
}

/// Always answers with the configured coordinates
#[derive(Debug, Clone)]
pub struct FixedLocator(pub Coords);

impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coords, LocateError> {
        Ok(self.0)
    }
}

/// The user opted out of location lookup
#[derive(Debug, Clone, Default)]
pub struct DisabledLocator;

impl Locator for DisabledLocator {
    async fn locate(&self) -> Result<Coords, LocateError> {
        Err(LocateError::PermissionDenied)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate position from the public IP address
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: Client,
    url: String,
}

impl IpLocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl Locator for IpLocator {
    async fn locate(&self) -> Result<Coords, LocateError> {
        if self.url.trim().is_empty() {
            return Err(LocateError::Unsupported);
        }
        let response = self.http.get(&self.url).send().await?;
        match response.status().as_u16() {
            200..=299 => {}
            401 | 403 => return Err(LocateError::PermissionDenied),
            status => {
                tracing::warn!(status, "IP geolocation failed");
                return Err(LocateError::PositionUnavailable);
            }
        }
        let lookup: IpLookup = response.json().await?;
        match (lookup.status.as_str(), lookup.lat, lookup.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coords { lat, lon }),
            (status, ..) => {
                tracing::warn!(status, "IP geolocation returned no position");
                Err(LocateError::PositionUnavailable)
            }
        }
    }
}

/// The locator picked by configuration
#[derive(Debug, Clone)]
pub enum AnyLocator {
    Fixed(FixedLocator),
    Ip(IpLocator),
    Disabled(DisabledLocator),
}

impl Locator for AnyLocator {
    async fn locate(&self) -> Result<Coords, LocateError> {
        match self {
            AnyLocator::Fixed(locator) => locator.locate().await,
            AnyLocator::Ip(locator) => locator.locate().await,
            AnyLocator::Disabled(locator) => locator.locate().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes() {
        let cases = [
            (
                LocateError::PermissionDenied,
                Some(1),
                "Location access denied. Please enable it for live weather.",
            ),
            (
                LocateError::PositionUnavailable,
                Some(2),
                "Location unavailable. Try again later.",
            ),
            (LocateError::Timeout, Some(3), "Location request timed out."),
            (LocateError::Unknown, None, "An unknown error occurred."),
            (
                LocateError::Unsupported,
                None,
                "Geolocation is not supported on this system.",
            ),
        ];
        for (err, code, message) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.to_string(), message);
        }
    }

    #[tokio::test]
    async fn test_fixed_and_disabled() {
        let coords = Coords { lat: 1.5, lon: -2.0 };
        assert_eq!(FixedLocator(coords).locate().await, Ok(coords));
        assert_eq!(
            DisabledLocator.locate().await,
            Err(LocateError::PermissionDenied)
        );
    }
}
