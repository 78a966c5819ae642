//! # Synthetic Wave Data Generator
//!
//! This module synthesizes plausible wave measurements for a buoy when no
//! real sensor hardware is attached. Each call produces one [`WaveSample`]
//! drawn from a "moderate open-ocean swell" regime:
//!
//! - Significant wave height between 0.5 and 5 meters
//! - Peak period between 4 and 15 seconds, with the mean period fixed at 90%
//!   of the peak period
//! - Peak direction anywhere on the compass, with the mean direction exactly
//!   opposite (wrapped back into [0, 360))
//! - Directional spreads wide enough to avoid degenerate zero-width
//!   distributions
//!
//! ## Timestamps
//!
//! Observation timestamps are backdated a whole number of hours, up to 24,
//! from the generation instant. Real buoy uplinks buffer and delay readings,
//! so consumers must already cope with out-of-order arrival times; the
//! synthetic feed reproduces that trait instead of stamping everything "now".
//! Timestamps are RFC 3339 UTC text with whole-second precision.
//!
//! ## Location Jitter
//!
//! A moored buoy drifts around its anchor. Samples add an independent
//! uniform deviation in [0, 0.01) degrees to each reference coordinate and
//! clamp the result to valid latitude/longitude ranges, so a buoy anchored
//! on a boundary never reports an out-of-range position.
//!
//! ## Random Source
//!
//! The generator is generic over [`rand::Rng`] and owns its source. Production
//! code seeds from OS entropy; tests use [`WaveGenerator::seeded`] for
//! reproducible draws. There are no error conditions: every draw is bounded
//! and every derived value is clamped, so no out-of-range sample can escape.

use crate::WaveSample;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Significant wave height range in meters.
const WAVE_HEIGHT_M: std::ops::Range<f64> = 0.5..5.0;
/// Peak period range in seconds.
const PEAK_PERIOD_S: std::ops::Range<f64> = 4.0..15.0;
/// Mean period as a fraction of the peak period.
const MEAN_PERIOD_FACTOR: f64 = 0.9;
/// Directional spread around the peak direction, degrees.
const PEAK_SPREAD_DEG: std::ops::Range<f64> = 5.0..35.0;
/// Directional spread around the mean direction, degrees.
const MEAN_SPREAD_DEG: std::ops::Range<f64> = 15.0..75.0;
/// Coordinate jitter magnitude in degrees.
const JITTER_DEG: std::ops::Range<f64> = 0.0..0.01;
/// Maximum whole hours a timestamp is backdated.
const BACKDATE_HOURS: i64 = 24;

const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Synthesizes wave samples from an owned random source.
///
/// Each monitor task owns one generator, so draws never contend on a shared
/// lock. Seeding is only needed for tests; no two tasks are required to
/// produce the same stream.
pub struct WaveGenerator<R: Rng = StdRng> {
    rng: R,
}

impl WaveGenerator<StdRng> {
    /// Create a generator seeded from OS entropy.
    ///
    /// Entropy-source failure panics here, at construction: a feed that
    /// cannot draw random values cannot produce plausible data, and starting
    /// the loop anyway would only publish garbage.
    pub fn from_entropy() -> Self {
        WaveGenerator {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducible tests.
    pub fn seeded(seed: u64) -> Self {
        WaveGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> WaveGenerator<R> {
    /// Wrap an existing random source.
    pub fn with_rng(rng: R) -> Self {
        WaveGenerator { rng }
    }

    /// Generate one wave sample near the given reference coordinates.
    ///
    /// The reference pair is the buoy's anchored position and is expected to
    /// be a valid coordinate; only the derived, jittered position is clamped
    /// here.
    pub fn generate(&mut self, initial_latitude: f64, initial_longitude: f64) -> WaveSample {
        self.generate_at(Utc::now(), initial_latitude, initial_longitude)
    }

    /// Generate one wave sample as of an explicit clock instant.
    ///
    /// Split out from [`generate`](Self::generate) so tests can pin the
    /// timestamp window.
    pub fn generate_at(
        &mut self,
        now: DateTime<Utc>,
        initial_latitude: f64,
        initial_longitude: f64,
    ) -> WaveSample {
        let significant_wave_height = self.rng.gen_range(WAVE_HEIGHT_M);
        let peak_period = self.rng.gen_range(PEAK_PERIOD_S);
        let peak_direction = self.rng.gen_range(0.0..360.0);
        let peak_directional_spread = self.rng.gen_range(PEAK_SPREAD_DEG);
        let mean_directional_spread = self.rng.gen_range(MEAN_SPREAD_DEG);

        // Backdate a whole number of hours to mimic buffered uplinks.
        let hours_ago = self.rng.gen_range(0..BACKDATE_HOURS);
        let timestamp = (now - Duration::hours(hours_ago)).to_rfc3339_opts(SecondsFormat::Secs, true);

        let (latitude, longitude) = self.jittered_location(initial_latitude, initial_longitude);

        WaveSample {
            significant_wave_height,
            peak_period,
            mean_period: peak_period * MEAN_PERIOD_FACTOR,
            peak_direction,
            peak_directional_spread,
            mean_direction: opposite_direction(peak_direction),
            mean_directional_spread,
            timestamp,
            latitude,
            longitude,
        }
    }

    /// Drift the reference position by an independent uniform deviation per
    /// axis, clamped to valid coordinate ranges.
    fn jittered_location(&mut self, initial_latitude: f64, initial_longitude: f64) -> (f64, f64) {
        let latitude_deviation = self.rng.gen_range(JITTER_DEG);
        let longitude_deviation = self.rng.gen_range(JITTER_DEG);

        let latitude = (initial_latitude + latitude_deviation).clamp(MIN_LATITUDE, MAX_LATITUDE);
        let longitude =
            (initial_longitude + longitude_deviation).clamp(MIN_LONGITUDE, MAX_LONGITUDE);

        (latitude, longitude)
    }
}

/// Direction opposite `peak` on the compass, in [0, 360).
///
/// Input is always in [0, 360), so the sum stays below 720 and a single
/// subtraction suffices for the wrap.
fn opposite_direction(peak: f64) -> f64 {
    let mut mean = peak + 180.0;
    if mean >= 360.0 {
        mean -= 360.0;
    }
    mean
}
