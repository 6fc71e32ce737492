//! metcast library
//!
//! Current weather conditions from the MET Norway locationforecast API, with
//! results cached per location for a short time.

pub mod cache;
pub mod cli;
pub mod data;

pub use cache::{CacheKey, Clock, ManualClock, SystemClock, WeatherCache};
pub use data::{
    Coordinate, Reading, Temperature, TemperatureUnit, WeatherClient, WeatherConfig,
    WeatherError, WeatherResult, WindSpeed,
};
