//! Unit conversions used when shaping forecast data
//!
//! Every conversion floors its result, matching how the readings are shown
//! to users (whole degrees, whole km/h).

/// Meters per second to kilometers per hour
const MPS_TO_KPH: f64 = 3.6;

/// Meters per second to miles per hour
const MPS_TO_MPH: f64 = 2.2369362921;

/// Floors a Celsius temperature to whole degrees
pub fn floor_celsius(celsius: f64) -> i64 {
    celsius.floor() as i64
}

/// Converts whole-degree Celsius to whole-degree Fahrenheit
///
/// The input is already floored, so `20.7` → `20` → `68`, not `69`.
pub fn celsius_to_fahrenheit(celsius: i64) -> i64 {
    (celsius as f64 * 9.0 / 5.0 + 32.0).floor() as i64
}

/// Converts a wind speed in m/s to whole km/h
pub fn mps_to_kph(mps: f64) -> i64 {
    (mps * MPS_TO_KPH).floor() as i64
}

/// Converts a wind speed in m/s to whole mph
pub fn mps_to_mph(mps: f64) -> i64 {
    (mps * MPS_TO_MPH).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_celsius_truncates_down() {
        assert_eq!(floor_celsius(20.7), 20);
        assert_eq!(floor_celsius(0.0), 0);
        assert_eq!(floor_celsius(-3.2), -4);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(20), 68);
        assert_eq!(celsius_to_fahrenheit(0), 32);
        assert_eq!(celsius_to_fahrenheit(-40), -40);
        // -4 * 1.8 + 32 = 24.8
        assert_eq!(celsius_to_fahrenheit(-4), 24);
    }

    #[test]
    fn test_wind_conversions() {
        assert_eq!(mps_to_kph(5.0), 18);
        assert_eq!(mps_to_mph(5.0), 11);
        assert_eq!(mps_to_kph(0.0), 0);
        assert_eq!(mps_to_mph(0.4), 0);
    }
}
