//! Renderers: map fetched weather onto the display template. Each one only
//! touches the part of the template it owns.

use tracing::{error, warn};

use crate::openweather::icon_url;
use crate::template::{Field, HourlyBlock, Template};
use crate::units;
use crate::weather::{self, ForecastEntry, WeatherSnapshot};

const MISSING: &str = "--";

pub mod current {
    use super::*;

    /// Write a snapshot into every field the template has
    pub fn render(template: &mut Template, snapshot: &WeatherSnapshot) {
        template.set(Field::City, snapshot.city.as_str());
        template.set(Field::Temperature, units::temperature::celsius(snapshot.temperature));
        template.set(
            Field::FeelsLike,
            format!(
                "Feels Like: {}",
                units::temperature::celsius(snapshot.feels_like)
            ),
        );
        template.set(Field::Condition, snapshot.description.as_str());
        template.set(Field::Humidity, format!("{}%", snapshot.humidity));
        template.set(Field::Wind, units::speed::kph(snapshot.wind_speed));
        template.set(Field::Pressure, format!("{} hPa", snapshot.pressure));
        template.set(Field::Sunrise, format!("Sunrise: {}", snapshot.sunrise_label()));
        template.set(Field::Sunset, format!("Sunset: {}", snapshot.sunset_label()));
        template.set(Field::Icon, icon(snapshot));
        template.set(Field::LocationButton, format!(" {}", snapshot.city));
    }

    /// Provider icon when the response names one, else the bundled asset for
    /// the condition category
    pub fn icon(snapshot: &WeatherSnapshot) -> String {
        match &snapshot.icon {
            Some(icon) => icon_url(icon),
            None => snapshot.condition.local_icon().to_string(),
        }
    }
}

pub mod daily {
    use super::*;

    /// Fill the day slots with one entry per weekday. Slot imagery is kept.
    /// Templates with too few slots are left untouched.
    pub fn render(template: &mut Template, entries: &[ForecastEntry]) {
        let slots = template.forecast_slots_mut();
        if slots.len() < Template::FORECAST_SLOTS {
            error!(
                found = slots.len(),
                expected = Template::FORECAST_SLOTS,
                "Forecast slots missing from template"
            );
            return;
        }

        let days = weather::one_per_weekday(entries, Template::FORECAST_DAYS);
        if days.len() < Template::FORECAST_DAYS {
            warn!(days = days.len(), "Forecast covers fewer days than slots");
        }
        for (index, day) in days.into_iter().enumerate() {
            slots[index * 2].text = units::temperature::celsius(day.temperature);
            slots[index * 2 + 1].text = format!("{}, {}", day.weekday, day.date);
        }
    }
}

pub mod hourly {
    use super::*;

    pub const BLOCKS: usize = 5;
    /// Index of the block that shows fixed template content
    pub const PLACEHOLDER_INDEX: usize = 3;

    pub fn placeholder() -> HourlyBlock {
        HourlyBlock {
            time: "21:00".to_string(),
            icon: Some("cloudy.png".to_string()),
            temperature: "25°C".to_string(),
            wind_icon: "right direction.png",
            wind: "3km/h".to_string(),
            placeholder: true,
        }
    }

    fn block(entry: &ForecastEntry) -> HourlyBlock {
        HourlyBlock {
            time: entry.time_label(),
            icon: entry.icon.as_deref().map(icon_url),
            temperature: units::temperature::celsius(entry.temperature),
            wind_icon: "direction.png",
            wind: entry
                .wind_speed
                .map(units::speed::kph)
                .unwrap_or_else(|| MISSING.to_string()),
            placeholder: false,
        }
    }

    /// Replace the hourly container with the first five entries. With
    /// `pin_placeholder`, the fourth block keeps the template's fixed content.
    pub fn render(template: &mut Template, entries: &[ForecastEntry], pin_placeholder: bool) {
        template.clear_hourly();
        for (index, entry) in entries.iter().take(BLOCKS).enumerate() {
            let block = if pin_placeholder && index == PLACEHOLDER_INDEX {
                placeholder()
            } else {
                block(entry)
            };
            template.push_hourly(block);
        }
    }
}
