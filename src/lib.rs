//! Terminal weather dashboard backed by OpenWeatherMap

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod fetcher;
pub mod locate;
pub mod openweather;
pub mod prefs;
pub mod render;
pub mod template;
pub mod ui;
pub mod units;
pub mod weather;
