use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::locate::GEO_URL;
use crate::openweather::BASE_URL;

const ABOUT: &str = "OpenWeatherMap dashboard TUI";

const LONG_ABOUT: &str = "
Terminal dashboard for current conditions, an hourly strip and a five day forecast, sourced from
OpenWeatherMap.

Type a city name and press Enter to search, or press Ctrl-L to use your current location. An
OpenWeatherMap API key is required; get one at https://openweathermap.org/api.

The theme choice and a count of launches are saved between runs.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to show on startup (e.g. London, \"New York\")")]
    pub city: Option<String>,

    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, default_value = BASE_URL, help = "Weather API base URL")]
    pub api_base: String,

    #[arg(long, requires = "lon", allow_negative_numbers = true, help = "Fixed latitude for Ctrl-L")]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true, help = "Fixed longitude for Ctrl-L")]
    pub lon: Option<f64>,

    #[arg(long, conflicts_with = "lat", help = "Refuse location lookups")]
    pub no_location: bool,

    #[arg(long, default_value = GEO_URL, help = "IP geolocation endpoint")]
    pub geo_url: String,

    #[arg(long, help = "Where preferences and logs are kept")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Log file [default: <data-dir>/wxboard.log]")]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value_t = 10, help = "HTTP timeout in seconds")]
    pub timeout_secs: u64,

    #[arg(long, help = "Show real data in the fourth hourly block")]
    pub live_fourth_hour: bool,
}
