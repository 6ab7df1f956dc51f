//! Trailing 48-hour listener history, sampled every ten minutes.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::station::StationId;

/// Length of the trailing history window.
pub const HISTORY_WINDOW_HOURS: i64 = 48;
/// Spacing between two history samples.
pub const SAMPLE_INTERVAL_MINUTES: i64 = 10;
/// Floor applied to every listener figure.
pub const LISTENER_FLOOR: i64 = 15_000;

/// One history point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySample {
    pub timestamp: NaiveDateTime,
    pub listeners: u32,
    pub hour: u32,
    pub mobile_percent: u8,
    pub engagement: u8,
}

/// Time-of-day audience bucket, shared by history generation and the
/// per-cycle listener update. Hours are checked inclusively in declaration
/// order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    MorningPeak,
    Commute,
    PrimeTime,
    Night,
    Daytime,
}

impl DayPart {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            6..=9 => DayPart::MorningPeak,
            16..=19 => DayPart::Commute,
            20..=23 => DayPart::PrimeTime,
            0..=5 => DayPart::Night,
            _ => DayPart::Daytime,
        }
    }

    /// Base level and random offset range for station 1 history samples.
    fn history_base(self) -> (i64, i64, i64) {
        match self {
            DayPart::MorningPeak => (85_000, -8_000, 15_000),
            DayPart::Commute => (78_000, -6_000, 10_000),
            DayPart::PrimeTime => (92_000, -10_000, 18_000),
            DayPart::Night => (25_000, -5_000, 8_000),
            DayPart::Daytime => (65_000, -5_000, 7_000),
        }
    }

    /// Multiplicative factor applied to the station's reference audience.
    pub fn factor(self) -> f64 {
        match self {
            DayPart::MorningPeak => 1.0,
            DayPart::Commute => 0.95,
            DayPart::PrimeTime => 1.08,
            DayPart::Night => 0.35,
            DayPart::Daytime => 0.85,
        }
    }

    /// Fraction of the reference audience the random swing may reach.
    pub fn volatility(self) -> f64 {
        match self {
            DayPart::MorningPeak => 0.06,
            DayPart::Commute => 0.05,
            DayPart::PrimeTime => 0.07,
            DayPart::Night => 0.08,
            DayPart::Daytime => 0.04,
        }
    }
}

/// Station 2's history is this share of station 1's.
const STATION_TWO_SCALE: f64 = 0.85;
const NOISE: i64 = 3_000;

/// Immutable history generated once per generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoricalSeries {
    samples: Vec<HistorySample>,
}

impl HistoricalSeries {
    /// Generate samples from `end - 48h` to `end` inclusive.
    ///
    /// Drawing from `rng` makes each call produce new values with the same
    /// daily shape.
    pub fn generate(station: StationId, end: NaiveDateTime, rng: &mut fastrand::Rng) -> Self {
        let step = Duration::minutes(SAMPLE_INTERVAL_MINUTES);
        let mut current = end - Duration::hours(HISTORY_WINDOW_HOURS);
        let mut samples = Vec::with_capacity(expected_len());

        while current <= end {
            let hour = current.hour();
            let (level, low, high) = DayPart::for_hour(hour).history_base();
            let mut base = level + rng.i64(low..=high);
            if station == StationId::Two {
                base = (base as f64 * STATION_TWO_SCALE) as i64;
            }
            let listeners = (base + rng.i64(-NOISE..=NOISE)).max(LISTENER_FLOOR);

            samples.push(HistorySample {
                timestamp: current,
                listeners: listeners as u32,
                hour,
                mobile_percent: rng.u8(65..=75),
                engagement: rng.u8(70..=88),
            });
            current += step;
        }

        Self { samples }
    }

    pub fn samples(&self) -> &[HistorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples at or after `since`.
    pub fn since(&self, since: NaiveDateTime) -> &[HistorySample] {
        let start = self.samples.partition_point(|s| s.timestamp < since);
        &self.samples[start..]
    }
}

/// Number of samples in a full window: one per interval plus the end point.
pub const fn expected_len() -> usize {
    (HISTORY_WINDOW_HOURS * 60 / SAMPLE_INTERVAL_MINUTES) as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn series_has_289_points() {
        let mut rng = fastrand::Rng::with_seed(1);
        let series = HistoricalSeries::generate(StationId::One, at(14, 0), &mut rng);
        assert_eq!(series.len(), 289);
        assert_eq!(series.len(), expected_len());
    }

    #[test]
    fn timestamps_strictly_increase() {
        let mut rng = fastrand::Rng::with_seed(2);
        let series = HistoricalSeries::generate(StationId::Two, at(9, 37), &mut rng);
        for pair in series.samples().windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(10));
        }
        assert_eq!(series.samples().last().unwrap().timestamp, at(9, 37));
    }

    #[test]
    fn samples_respect_ranges() {
        let mut rng = fastrand::Rng::with_seed(3);
        for station in StationId::ALL {
            let series = HistoricalSeries::generate(station, at(23, 50), &mut rng);
            for s in series.samples() {
                assert!(s.listeners >= LISTENER_FLOOR as u32);
                assert!((65..=75).contains(&s.mobile_percent));
                assert!((70..=88).contains(&s.engagement));
                assert_eq!(s.hour, s.timestamp.hour());
            }
        }
    }

    #[test]
    fn station_one_night_samples_stay_in_bucket() {
        let mut rng = fastrand::Rng::with_seed(4);
        let series = HistoricalSeries::generate(StationId::One, at(12, 0), &mut rng);
        for s in series.samples().iter().filter(|s| s.hour <= 5) {
            // 25000 + [-5000, 8000] + [-3000, 3000]
            assert!(s.listeners >= 17_000 && s.listeners <= 36_000, "{}", s.listeners);
        }
    }

    #[test]
    fn station_two_prime_time_is_scaled() {
        let mut rng = fastrand::Rng::with_seed(5);
        let series = HistoricalSeries::generate(StationId::Two, at(12, 0), &mut rng);
        for s in series.samples().iter().filter(|s| (20..=23).contains(&s.hour)) {
            // (92000 + [-10000, 18000]) * 0.85 + [-3000, 3000]
            assert!(s.listeners >= 66_700 && s.listeners <= 96_500, "{}", s.listeners);
        }
    }

    #[test]
    fn same_seed_same_series() {
        let a = HistoricalSeries::generate(StationId::One, at(8, 0), &mut fastrand::Rng::with_seed(9));
        let b = HistoricalSeries::generate(StationId::One, at(8, 0), &mut fastrand::Rng::with_seed(9));
        assert_eq!(a, b);
    }

    #[test]
    fn since_returns_trailing_window() {
        let mut rng = fastrand::Rng::with_seed(6);
        let end = at(18, 0);
        let series = HistoricalSeries::generate(StationId::One, end, &mut rng);
        let recent = series.since(end - Duration::hours(6));
        assert_eq!(recent.len(), 37);
        assert_eq!(recent[0].timestamp, at(12, 0));
    }

    #[test]
    fn day_parts_use_inclusive_bounds() {
        assert_eq!(DayPart::for_hour(9), DayPart::MorningPeak);
        assert_eq!(DayPart::for_hour(10), DayPart::Daytime);
        assert_eq!(DayPart::for_hour(15), DayPart::Daytime);
        assert_eq!(DayPart::for_hour(19), DayPart::Commute);
        assert_eq!(DayPart::for_hour(23), DayPart::PrimeTime);
        assert_eq!(DayPart::for_hour(0), DayPart::Night);
    }
}
