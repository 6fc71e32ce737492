//! In-memory TTL cache for shaped weather results
//!
//! Provides a `WeatherCache` that keeps one result per coordinate and unit
//! preference, each stamped with the time it was fetched. Entries older than
//! the TTL are treated as absent, and dropped when read or when any new
//! result is stored.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::data::{Coordinate, TemperatureUnit, WeatherResult};

/// Source of the current time for freshness checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can hand one clone to the cache and
/// advance the other.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Identifies a cache entry: the coordinate plus the unit preference
///
/// Coordinates are compared by bit pattern, so `0.0` and `-0.0` are distinct
/// keys and NaN can still be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    latitude_bits: u64,
    longitude_bits: u64,
    unit: Option<TemperatureUnit>,
}

impl CacheKey {
    pub fn new(coordinate: Coordinate, unit: Option<TemperatureUnit>) -> Self {
        Self {
            latitude_bits: coordinate.latitude.to_bits(),
            longitude_bits: coordinate.longitude.to_bits(),
            unit,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            f64::from_bits(self.latitude_bits),
            f64::from_bits(self.longitude_bits),
        )
    }

    pub fn unit(&self) -> Option<TemperatureUnit> {
        self.unit
    }
}

/// A cached result and when it was fetched
#[derive(Debug, Clone)]
struct CacheEntry {
    result: WeatherResult,
    fetched_at: DateTime<Utc>,
}

/// Time-bounded cache of weather results
///
/// Cloning is cheap and clones share entries.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
}

impl WeatherCache {
    /// Creates an empty cache backed by the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }

    /// Creates an empty cache that reads time from `clock`
    pub fn with_clock(ttl: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            ttl,
            clock: Arc::new(clock),
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached result for `key` if it is still fresh
    ///
    /// An entry is fresh while `now - fetched_at < ttl`. Stale entries are
    /// removed.
    pub fn get(&self, key: &CacheKey) -> Option<WeatherResult> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let entry = entries.get(key)?;
        if now - entry.fetched_at < self.ttl {
            return Some(entry.result.clone());
        }

        entries.remove(key);
        None
    }

    /// Stores `result` under `key`, stamped with the current time
    ///
    /// Replaces any existing entry for the key and drops every stale entry,
    /// so keys that are never read again do not pile up.
    pub fn insert(&self, key: CacheKey, result: WeatherResult) {
        let fetched_at = self.clock.now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| fetched_at - entry.fetched_at < self.ttl);
        entries.insert(key, CacheEntry { result, fetched_at });
    }

    /// When the entry for `key` was fetched, fresh or not
    pub fn fetched_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.entries.lock().get(key).map(|e| e.fetched_at)
    }

    /// Drops the entry for `key`, returning whether one existed
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, including stale ones not yet dropped
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
