//! # Buoy Tracker Core Library
//!
//! This library provides the data model and services for the buoy tracker
//! application: a small record-management service for ocean buoy telemetry
//! with a synthetic wave-data feed standing in for real sensor hardware.
//!
//! ## Architecture
//!
//! ### Record Store
//! Buoy records live behind the [`store::BuoyStore`] trait, a small
//! create/read/update/delete/list/append surface keyed by a string
//! identifier. The in-process [`store::MemoryStore`] implementation appends
//! wave samples atomically under its write lock, so concurrent monitors and
//! client calls never lose samples to read-modify-write races.
//!
//! ### Synthetic Wave Feed
//! [`wave_gen::WaveGenerator`] produces one physically-plausible
//! [`WaveSample`] per call: bounded uniform draws for height, period, and
//! direction, derived mean values, a backdated UTC timestamp, and a jittered
//! location clamped to valid coordinate ranges. The random source is
//! injectable so tests can seed it.
//!
//! ### Monitors
//! One background task per monitored buoy ([`monitor`]) drives the generator
//! on a fixed interval and submits each sample to the store. Tasks are
//! registered with a supervisor that can stop any single buoy's loop or shut
//! all of them down cleanly.
//!
//! ## Core Types
//!
//! - [`WaveSample`]: a single wave measurement, immutable once produced
//! - [`BuoyRecord`]: a buoy record with metadata and an append-only wave history
//! - [`BuoyReference`]: a buoy identifier anchored to fixed reference coordinates

use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod monitor;
pub mod store;
pub mod wave_gen;

/// A single wave measurement reported for a buoy.
///
/// Heights are in meters, periods in seconds, directions and spreads in
/// degrees. The timestamp is RFC 3339 UTC text with whole-second precision;
/// synthetic samples are backdated up to 24 hours to mimic buffered uplinks.
///
/// Two fields are derived rather than drawn: `mean_period` is always
/// `peak_period * 0.9`, and `mean_direction` is always
/// `(peak_direction + 180) mod 360`.
///
/// Samples are never mutated after creation.
///
/// # Example
/// ```
/// use buoy_tracker_lib::WaveSample;
///
/// let sample = WaveSample {
///     significant_wave_height: 2.4,
///     peak_period: 10.0,
///     mean_period: 9.0,
///     peak_direction: 270.0,
///     peak_directional_spread: 12.5,
///     mean_direction: 90.0,
///     mean_directional_spread: 40.0,
///     timestamp: "2026-08-06T04:00:00Z".to_string(),
///     latitude: 34.305,
///     longitude: -120.610,
/// };
///
/// assert!((sample.mean_period - sample.peak_period * 0.9).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveSample {
    /// Significant wave height in meters
    pub significant_wave_height: f64,
    /// Dominant wave period in seconds
    pub peak_period: f64,
    /// Mean wave period in seconds, always `peak_period * 0.9`
    pub mean_period: f64,
    /// Direction of the dominant swell in degrees, [0, 360)
    pub peak_direction: f64,
    /// Directional spread around the peak direction in degrees
    pub peak_directional_spread: f64,
    /// Mean direction in degrees, opposite the peak direction, [0, 360)
    pub mean_direction: f64,
    /// Directional spread around the mean direction in degrees
    pub mean_directional_spread: f64,
    /// Observation time, RFC 3339 UTC ("Z"), whole seconds
    pub timestamp: String,
    /// Observed latitude in degrees, within [-90, 90]
    pub latitude: f64,
    /// Observed longitude in degrees, within [-180, 180]
    pub longitude: f64,
}

/// A buoy record held by the store.
///
/// Metadata fields describe the platform itself; `waves` is the ordered
/// measurement history. Monitors only ever append to `waves`; they never
/// reorder or trim it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuoyRecord {
    /// Store identifier, non-empty ASCII alphanumeric/`-`/`_`
    pub id: String,
    /// Human-readable buoy name
    pub name: String,
    /// Deployment site description
    pub location: String,
    /// Telemetry payload type reported by the platform
    pub payload_type: String,
    /// Battery bus voltage in volts
    pub battery_voltage: f64,
    /// Battery output power in watts
    pub battery_power: f64,
    /// Solar panel voltage in volts
    pub solar_voltage: f64,
    /// Relative humidity inside the hull, percent
    pub humidity: f64,
    /// Ordered wave measurement history, append-only
    #[serde(default)]
    pub waves: Vec<WaveSample>,
}

impl BuoyRecord {
    /// Create an empty record with the given identity and site metadata.
    ///
    /// Electrical telemetry starts at zero and the wave history starts
    /// empty; both are filled in by the live feed.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        BuoyRecord {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            payload_type: "waves".to_string(),
            battery_voltage: 0.0,
            battery_power: 0.0,
            solar_voltage: 0.0,
            humidity: 0.0,
            waves: Vec::new(),
        }
    }
}

/// A buoy identifier anchored to its fixed deployment coordinates.
///
/// The reference position is where the buoy is moored; individual samples
/// jitter around it by less than 0.01 degrees. Immutable for the lifetime of
/// a monitor loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuoyReference {
    /// Store identifier of the monitored record
    pub id: String,
    /// Anchored latitude in degrees
    pub latitude: f64,
    /// Anchored longitude in degrees
    pub longitude: f64,
}

impl BuoyReference {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        BuoyReference {
            id: id.into(),
            latitude,
            longitude,
        }
    }
}
