//! metcast - Current weather conditions from MET Norway
//!
//! Looks up each `--location` concurrently and prints one line per location.

use std::process::ExitCode;

use clap::Parser;
use futures::future::join_all;
use tracing::error;
use tracing_subscriber::EnvFilter;

use metcast::cli::Cli;
use metcast::{Coordinate, WeatherClient, WeatherResult};

/// Sets up stderr logging, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Formats a result as a single human-readable line
fn render_line(coordinate: Coordinate, result: &WeatherResult) -> String {
    let temperature = &result.temperature;
    let headline = match (temperature.local, temperature.symbol) {
        (Some(local), Some(symbol)) => format!("{}{}", local, symbol),
        _ => format!("{}°C / {}°F", temperature.celsius, temperature.fahrenheit),
    };

    let mut line = format!(
        "{}  {}  wind {} km/h ({} mph) from {}°",
        coordinate,
        headline,
        result.wind_speed.kph,
        result.wind_speed.mph,
        result.wind_from_direction.round()
    );
    if let Some(symbol_code) = &result.symbol_code {
        line.push_str("  ");
        line.push_str(symbol_code);
    }
    line
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let client = match WeatherClient::with_config(cli.weather_config()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("metcast: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let unit = cli.temperature_unit();
    let lookups = cli.locations.iter().map(|&coordinate| {
        let client = &client;
        async move {
            let result = match unit {
                Some(unit) => client.get_weather_with_unit(coordinate, unit).await,
                None => client.get_weather(coordinate).await,
            };
            (coordinate, result)
        }
    });

    let mut failed = false;
    for (coordinate, result) in join_all(lookups).await {
        match result {
            Ok(weather) if cli.json => match serde_json::to_string(&weather) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!(location = %coordinate, error = %e, "Failed to encode result");
                    failed = true;
                }
            },
            Ok(weather) => println!("{}", render_line(coordinate, &weather)),
            Err(e) => {
                eprintln!("metcast: {}: {}", coordinate, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
