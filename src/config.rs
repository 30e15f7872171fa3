use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::cli::Args;
use crate::locate::{AnyLocator, Coords, DisabledLocator, FixedLocator, IpLocator};
use crate::openweather::WeatherClient;

#[derive(Debug, Clone)]
pub enum LocationSource {
    Fixed(Coords),
    Ip(String),
    Disabled,
}

/// Everything resolved from the command line and environment
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub startup_city: Option<String>,
    pub location: LocationSource,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub timeout: Duration,
    pub pin_placeholder_hour: bool,
}

impl Config {
    const APP_DIR: &'static str = "wxboard";
    const PREFERENCES: &'static str = "preferences.json";
    const LOG: &'static str = "wxboard.log";

    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let api_key = args.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(anyhow!("API key is empty"));
        }

        let data_dir = match args.data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .map(|dir| dir.join(Self::APP_DIR))
                .context("Could not determine a data directory, pass --data-dir")?,
        };
        let log_file = args.log_file.unwrap_or_else(|| data_dir.join(Self::LOG));

        let location = match (args.no_location, args.lat, args.lon) {
            (true, ..) => LocationSource::Disabled,
            (false, Some(lat), Some(lon)) => LocationSource::Fixed(Coords { lat, lon }),
            _ => LocationSource::Ip(args.geo_url),
        };

        Ok(Self {
            api_key,
            api_base: args.api_base,
            startup_city: args
                .city
                .map(|city| city.trim().to_string())
                .filter(|city| !city.is_empty()),
            location,
            data_dir,
            log_file,
            timeout: Duration::from_secs(args.timeout_secs),
            pin_placeholder_hour: !args.live_fourth_hour,
        })
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(Self::PREFERENCES)
    }

    pub fn weather_client(&self) -> anyhow::Result<WeatherClient> {
        WeatherClient::new(&self.api_base, &self.api_key, self.timeout)
            .context("Error building HTTP client")
    }

    pub fn locator(&self) -> anyhow::Result<AnyLocator> {
        Ok(match &self.location {
            LocationSource::Fixed(coords) => AnyLocator::Fixed(FixedLocator(*coords)),
            LocationSource::Ip(url) => AnyLocator::Ip(
                IpLocator::new(url, self.timeout).context("Error building HTTP client")?,
            ),
            LocationSource::Disabled => AnyLocator::Disabled(DisabledLocator),
        })
    }
}
