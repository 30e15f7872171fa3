//! The fixed display template that renderers write into and the terminal UI
//! draws. It plays the part of an HTML document: a set of named fields that
//! may or may not be present, ten forecast slots, an hourly container, and a
//! lazily created overlay.

use std::collections::BTreeMap;

/// Named single-value display fields
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    City,
    Temperature,
    FeelsLike,
    Condition,
    Humidity,
    Wind,
    Pressure,
    Sunrise,
    Sunset,
    Icon,
    LocationButton,
    LiveTime,
    LiveDate,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::City,
        Field::Temperature,
        Field::FeelsLike,
        Field::Condition,
        Field::Humidity,
        Field::Wind,
        Field::Pressure,
        Field::Sunrise,
        Field::Sunset,
        Field::Icon,
        Field::LocationButton,
        Field::LiveTime,
        Field::LiveDate,
    ];
}

/// One of the preassigned daily forecast slots. Slots come in pairs per day:
/// temperature first, then the weekday/date label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForecastSlot {
    pub text: String,
    /// Static imagery bundled with the template; renderers leave it alone
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HourlyBlock {
    pub time: String,
    pub icon: Option<String>,
    pub temperature: String,
    pub wind_icon: &'static str,
    pub wind: String,
    /// Fixed template content rather than data
    pub placeholder: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
    fields: BTreeMap<Field, String>,
    forecast_slots: Vec<ForecastSlot>,
    hourly: Vec<HourlyBlock>,
    overlay: Option<String>,
}

impl Template {
    pub const FORECAST_DAYS: usize = 5;
    pub const FORECAST_SLOTS: usize = Self::FORECAST_DAYS * 2;
    const DAY_IMAGES: [&'static str; Self::FORECAST_DAYS] = [
        "cloudy.png",
        "sunny.png",
        "rainy.png",
        "cloudy.png",
        "sunny.png",
    ];

    /// The dashboard layout with every field and all ten forecast slots
    pub fn dashboard() -> Self {
        Self::with_fields(&Field::ALL, Self::FORECAST_SLOTS)
    }

    /// A template holding only the given fields and `slots` forecast slots
    pub fn with_fields(fields: &[Field], slots: usize) -> Self {
        let fields = fields
            .iter()
            .map(|field| (*field, "--".to_string()))
            .collect();
        let forecast_slots = (0..slots)
            .map(|i| ForecastSlot {
                text: "--".to_string(),
                image: (i % 2 == 0)
                    .then(|| Self::DAY_IMAGES[(i / 2) % Self::FORECAST_DAYS].to_string()),
            })
            .collect();
        Self {
            fields,
            forecast_slots,
            hourly: Vec::new(),
            overlay: None,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Write a field if the template has it. Returns whether it was written.
    pub fn set(&mut self, field: Field, text: impl Into<String>) -> bool {
        match self.fields.get_mut(&field) {
            Some(value) => {
                *value = text.into();
                true
            }
            None => false,
        }
    }

    pub fn forecast_slots(&self) -> &[ForecastSlot] {
        &self.forecast_slots
    }

    pub fn forecast_slots_mut(&mut self) -> &mut [ForecastSlot] {
        &mut self.forecast_slots
    }

    pub fn hourly(&self) -> &[HourlyBlock] {
        &self.hourly
    }

    pub fn clear_hourly(&mut self) {
        self.hourly.clear();
    }

    pub fn push_hourly(&mut self, block: HourlyBlock) {
        self.hourly.push(block);
    }

    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Get the overlay, creating it empty if it doesn't exist yet
    pub fn overlay_mut(&mut self) -> &mut String {
        self.overlay.get_or_insert_with(String::new)
    }
}
