//! Live wall-clock display
use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::template::{Field, Template};
use crate::units;

/// e.g. `3:07 PM`
pub fn time_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    units::clock::twelve_hour(now.hour(), now.minute())
}

/// e.g. `Saturday 18 Oct`
pub fn date_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} {}", now.format("%A"), now.format("%-d %b"))
}

/// Write the time and date fields for `now`
pub fn render<Tz: TimeZone>(template: &mut Template, now: &DateTime<Tz>)
where
    Tz::Offset: std::fmt::Display,
{
    template.set(Field::LiveTime, time_label(now));
    template.set(Field::LiveDate, date_label(now));
}

/// Tracks the last rendered second so the display updates once per second
#[derive(Debug, Default)]
pub struct Ticker {
    last: Option<i64>,
}

impl Ticker {
    /// Re-render if the wall-clock second changed. Returns whether it did.
    pub fn tick(&mut self, template: &mut Template) -> bool {
        let now = Local::now();
        let second = now.timestamp();
        if self.last == Some(second) {
            return false;
        }
        self.last = Some(second);
        render(template, &now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_labels() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 15, 7, 42).unwrap();
        assert_eq!(time_label(&now), "3:07 PM");
        assert_eq!(date_label(&now), "Saturday 17 Oct");
    }

    #[test]
    fn test_ticker_renders_once_per_second() {
        let mut template = Template::dashboard();
        let mut ticker = Ticker::default();
        assert!(ticker.tick(&mut template));
        assert_ne!(template.get(Field::LiveTime), Some("--"));
        assert_ne!(template.get(Field::LiveDate), Some("--"));
    }
}
