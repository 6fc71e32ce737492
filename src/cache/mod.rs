//! Cache module for recently fetched weather
//!
//! This module provides an in-memory cache with a per-entry TTL (time-to-live),
//! keyed by coordinate and unit preference. Time comes from a [`Clock`] so
//! tests can move it by hand.

mod memory;

pub use memory::{CacheKey, Clock, ManualClock, SystemClock, WeatherCache};
