//! Domain types handed from the fetcher to the renderers. Nothing here is
//! retained between fetches.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use thiserror::Error;

use crate::openweather::{current, forecast};
use crate::units;

/// Coarse condition category, as reported in `weather[0].main`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Drizzle,
    Mist,
    Fog,
    Other(String),
}

impl Condition {
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Drizzle" => Self::Drizzle,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            other => Self::Other(other.to_string()),
        }
    }

    /// Bundled icon asset for this category
    pub fn local_icon(&self) -> &'static str {
        match self {
            Self::Clear => "sunny.png",
            Self::Clouds => "cloudy.png",
            Self::Rain => "rainy.png",
            Self::Thunderstorm => "thunderstorm.png",
            Self::Snow => "snow.png",
            Self::Drizzle => "drizzle.png",
            Self::Mist => "mist.png",
            Self::Fog => "fog.png",
            Self::Other(_) => "default.png",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("missing field `{0}`")]
pub struct MalformedResponse(pub &'static str);

/// A single current-conditions observation
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub condition: Condition,
    pub icon: Option<String>,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub sunrise: i64,
    pub sunset: i64,
    /// Seconds east of UTC for the observed location
    pub utc_offset: i64,
}

impl WeatherSnapshot {
    pub fn sunrise_label(&self) -> String {
        wall_clock(self.sunrise, self.utc_offset)
    }

    pub fn sunset_label(&self) -> String {
        wall_clock(self.sunset, self.utc_offset)
    }
}

impl TryFrom<current::Current> for WeatherSnapshot {
    type Error = MalformedResponse;

    fn try_from(data: current::Current) -> Result<Self, Self::Error> {
        let main = data.main.ok_or(MalformedResponse("main"))?;
        let sys = data.sys.ok_or(MalformedResponse("sys"))?;
        let weather = data
            .weather
            .into_iter()
            .next()
            .ok_or(MalformedResponse("weather"))?;
        let wind = data.wind.ok_or(MalformedResponse("wind"))?;
        let city = data.name.ok_or(MalformedResponse("name"))?;

        Ok(Self {
            city,
            temperature: main.temp,
            feels_like: main.feels_like,
            condition: Condition::from_main(&weather.main),
            description: weather.description,
            icon: weather.icon.filter(|icon| !icon.is_empty()),
            humidity: main.humidity,
            wind_speed: wind.speed,
            pressure: main.pressure,
            sunrise: sys.sunrise,
            sunset: sys.sunset,
            utc_offset: data.timezone,
        })
    }
}

/// Shift `epoch` by `offset` and read the result as UTC. The shift alone
/// localizes the instant, so no further timezone conversion is applied.
pub fn wall_clock(epoch: i64, offset: i64) -> String {
    let shifted = epoch
        .checked_add(offset)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    match shifted {
        Some(shifted) => units::clock::twelve_hour(shifted.hour(), shifted.minute()),
        None => "--".to_string(),
    }
}

/// One predicted-weather record
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature: f64,
    pub weekday: String,
    pub date: String,
    pub wind_speed: Option<f64>,
    pub icon: Option<String>,
}

impl ForecastEntry {
    pub fn from_item(item: forecast::Item, offset: FixedOffset) -> Option<Self> {
        let timestamp = DateTime::<Utc>::from_timestamp(item.dt, 0)?.with_timezone(&offset);
        Some(Self {
            weekday: timestamp.format("%A").to_string(),
            date: timestamp.format("%-d %b").to_string(),
            timestamp,
            temperature: item.main.temp,
            wind_speed: item.wind.map(|wind| wind.speed),
            icon: item
                .weather
                .into_iter()
                .next()
                .and_then(|weather| weather.icon)
                .filter(|icon| !icon.is_empty()),
        })
    }

    /// `HH:MM`, 24-hour
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Convert a forecast response into entries, labelled in the city's own
/// UTC offset. Unrepresentable timestamps are dropped.
pub fn forecast_entries(data: forecast::Forecast) -> Vec<ForecastEntry> {
    let seconds = data.city.map(|city| city.timezone).unwrap_or_default();
    let offset = i32::try_from(seconds)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());
    data.list
        .into_iter()
        .filter_map(|item| ForecastEntry::from_item(item, offset))
        .collect()
}

/// First entry of each distinct weekday, in sequence order, capped at `days`
pub fn one_per_weekday(entries: &[ForecastEntry], days: usize) -> Vec<&ForecastEntry> {
    let mut seen = Vec::with_capacity(days);
    let mut picked = Vec::with_capacity(days);
    for entry in entries {
        let weekday = entry.timestamp.weekday();
        if seen.contains(&weekday) {
            continue;
        }
        seen.push(weekday);
        picked.push(entry);
        if picked.len() == days {
            break;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(dt: i64, temp: f64) -> forecast::Item {
        forecast::Item {
            dt,
            main: forecast::ItemMain { temp },
            wind: Some(current::Wind { speed: 2.5 }),
            weather: vec![forecast::Icon {
                icon: Some("04d".to_string()),
            }],
        }
    }

    fn current_response() -> current::Current {
        serde_json::from_str(
            r#"{
                "name": "London",
                "timezone": 3600,
                "main": {"temp": 14.6, "feels_like": 13.2, "humidity": 82, "pressure": 1012},
                "weather": [{"main": "Clouds", "description": "broken clouds", "icon": "04d"}],
                "wind": {"speed": 4.1},
                "sys": {"sunrise": 1700000000, "sunset": 1700030000}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_from_response() {
        let snapshot = WeatherSnapshot::try_from(current_response()).unwrap();
        assert_eq!(snapshot.city, "London");
        assert_eq!(snapshot.condition, Condition::Clouds);
        assert_eq!(snapshot.icon.as_deref(), Some("04d"));
        assert_eq!(snapshot.utc_offset, 3600);
    }

    #[test]
    fn test_snapshot_missing_sys() {
        let mut response = current_response();
        response.sys = None;
        assert_eq!(
            WeatherSnapshot::try_from(response),
            Err(MalformedResponse("sys"))
        );
    }

    #[test]
    fn test_snapshot_empty_weather() {
        let mut response = current_response();
        response.weather.clear();
        assert_eq!(
            WeatherSnapshot::try_from(response),
            Err(MalformedResponse("weather"))
        );
    }

    #[test]
    fn test_wall_clock_uses_offset_only() {
        // 1970-01-01 05:03 UTC, shifted one hour east
        assert_eq!(wall_clock(5 * 3600 + 3 * 60, 3600), "6:03 AM");
        // Negative offsets shift back across midnight
        assert_eq!(wall_clock(3600, -2 * 3600), "11:00 PM");
        assert_eq!(wall_clock(i64::MAX, 3600), "--");
        assert_eq!(wall_clock(i64::MIN, -1), "--");
    }

    #[test]
    fn test_local_icon_fallback() {
        assert_eq!(Condition::from_main("Rain").local_icon(), "rainy.png");
        assert_eq!(Condition::from_main("Haze").local_icon(), "default.png");
    }

    #[test]
    fn test_forecast_labels_use_city_offset() {
        // 2024-05-24T23:00:00Z is already Saturday at +02:00
        let data = forecast::Forecast {
            list: vec![item(1716591600, 20.0)],
            city: Some(forecast::City { timezone: 7200 }),
        };
        let entries = forecast_entries(data);
        assert_eq!(entries[0].weekday, "Saturday");
        assert_eq!(entries[0].date, "25 May");
        assert_eq!(entries[0].time_label(), "01:00");
    }

    #[test]
    fn test_one_per_weekday() {
        // Every 3 hours for 6 days, starting 2024-05-24T00:00:00Z (Friday)
        let start = 1716508800;
        let data = forecast::Forecast {
            list: (0..48)
                .map(|i| item(start + i * 3 * 3600, i as f64))
                .collect(),
            city: None,
        };
        let entries = forecast_entries(data);
        let days = one_per_weekday(&entries, 5);
        let labels: Vec<_> = days.iter().map(|e| e.weekday.as_str()).collect();
        assert_eq!(
            labels,
            ["Friday", "Saturday", "Sunday", "Monday", "Tuesday"]
        );
        // First chronological entry of each day
        let temps: Vec<_> = days.iter().map(|e| e.temperature).collect();
        assert_eq!(temps, [0.0, 8.0, 16.0, 24.0, 32.0]);
    }
}
