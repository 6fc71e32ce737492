//! Command-line interface parsing for metcast
//!
//! This module handles parsing of CLI arguments using clap and maps them onto
//! a [`WeatherConfig`] and the list of locations to look up.

use clap::Parser;

use crate::data::{Coordinate, TemperatureUnit, WeatherConfig};

/// metcast - Current weather conditions from MET Norway
#[derive(Parser, Debug)]
#[command(name = "metcast")]
#[command(about = "Current weather conditions from the MET Norway locationforecast API")]
#[command(version)]
pub struct Cli {
    /// Location to look up as LAT,LON (repeatable)
    ///
    /// Examples:
    ///   metcast --location 59.91,10.75
    ///   metcast -l 49.27,-123.15 -l 60.39,5.32
    #[arg(
        short,
        long = "location",
        value_name = "LAT,LON",
        required = true,
        allow_hyphen_values = true
    )]
    pub locations: Vec<Coordinate>,

    /// Unit preference: "imperial" reports Fahrenheit, anything else Celsius
    ///
    /// Without this flag only the Celsius and Fahrenheit readings are shown.
    #[arg(long, value_name = "UNITS")]
    pub units: Option<String>,

    /// Print results as JSON, one object per line
    #[arg(long)]
    pub json: bool,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// How long results are served from cache, in minutes
    #[arg(long, value_name = "MINUTES")]
    pub cache_ttl: Option<u32>,
}

impl Cli {
    /// The unit preference, if one was given
    pub fn temperature_unit(&self) -> Option<TemperatureUnit> {
        self.units.as_deref().map(TemperatureUnit::from_preference)
    }

    /// Client configuration with any overrides from the command line
    pub fn weather_config(&self) -> WeatherConfig {
        let mut config = WeatherConfig::default();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(ttl) = self.cache_ttl {
            config.cache_ttl_minutes = ttl;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_single_location() {
        let cli = Cli::parse_from(["metcast", "--location", "59.91,10.75"]);
        assert_eq!(cli.locations, vec![Coordinate::new(59.91, 10.75)]);
        assert!(cli.units.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_negative_coordinates() {
        let cli = Cli::parse_from(["metcast", "-l", "-33.86,151.2", "-l", "49.27,-123.15"]);
        assert_eq!(
            cli.locations,
            vec![
                Coordinate::new(-33.86, 151.2),
                Coordinate::new(49.27, -123.15)
            ]
        );
    }

    #[test]
    fn test_cli_requires_location() {
        assert!(Cli::try_parse_from(["metcast"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_location() {
        let result = Cli::try_parse_from(["metcast", "--location", "oslo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_temperature_unit_from_units_flag() {
        let cli = Cli::parse_from(["metcast", "-l", "1,2", "--units", "imperial"]);
        assert_eq!(cli.temperature_unit(), Some(TemperatureUnit::Fahrenheit));

        let cli = Cli::parse_from(["metcast", "-l", "1,2", "--units", "metric"]);
        assert_eq!(cli.temperature_unit(), Some(TemperatureUnit::Celsius));

        let cli = Cli::parse_from(["metcast", "-l", "1,2"]);
        assert_eq!(cli.temperature_unit(), None);
    }

    #[test]
    fn test_weather_config_defaults() {
        let cli = Cli::parse_from(["metcast", "-l", "1,2"]);
        let config = cli.weather_config();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.cache_ttl_minutes, 35);
    }

    #[test]
    fn test_weather_config_overrides() {
        let cli = Cli::parse_from([
            "metcast",
            "-l",
            "1,2",
            "--base-url",
            "http://localhost:9000",
            "--timeout",
            "5",
            "--cache-ttl",
            "10",
        ]);
        let config = cli.weather_config();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_ttl_minutes, 10);
    }
}
