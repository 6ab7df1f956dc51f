use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use freedom_config::dashboard::{validate_refresh_secs, MAX_REFRESH_SECS, MIN_REFRESH_SECS};
use freedom_config::DashboardConfig;
use freedom_metrics::{AudienceSource, DashboardSnapshot, MetricsGenerator, StationId};

use crate::schedule::RefreshSchedule;

/// Builds the audience source for a station.
pub type SourceFactory = Box<dyn Fn(StationId) -> Box<dyn AudienceSource>>;

/// Wall-clock reader; swapped out in tests.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// One dashboard session: the selected station's audience source, the
/// refresh timer and the latest snapshot.
///
/// The hosting shell owns the session and hands snapshots to the panels.
/// Dropping it ends the refresh cycle.
pub struct DashboardSession {
    source: Box<dyn AudienceSource>,
    factory: SourceFactory,
    schedule: RefreshSchedule,
    clock: Clock,
    latest: Option<Arc<DashboardSnapshot>>,
    cycles: u64,
}

impl DashboardSession {
    /// Session backed by the synthetic generator, as configured.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let station = StationId::try_from(config.station)?;
        validate_refresh_secs(config.refresh_secs)?;
        let factory = generator_factory(config.seed, local_now);
        Ok(Self::with_factory(
            station,
            factory,
            Duration::from_secs(config.refresh_secs),
            local_now,
        ))
    }

    /// Session over any audience source.
    pub fn with_factory(
        station: StationId,
        factory: SourceFactory,
        interval: Duration,
        clock: Clock,
    ) -> Self {
        tracing::info!(
            station = station.number(),
            interval_secs = interval.as_secs(),
            "dashboard session started"
        );
        Self {
            source: factory(station),
            factory,
            schedule: RefreshSchedule::new(interval),
            clock,
            latest: None,
            cycles: 0,
        }
    }

    pub fn station(&self) -> StationId {
        self.source.station()
    }

    pub fn latest(&self) -> Option<&Arc<DashboardSnapshot>> {
        self.latest.as_ref()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn refresh_secs(&self) -> u64 {
        self.schedule.interval().as_secs()
    }

    /// Time left before the next scheduled cycle.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.schedule.remaining(now)
    }

    /// Run a cycle if one is due. Returns the new snapshot when it ran.
    pub fn poll(&mut self, now: Instant) -> Option<Arc<DashboardSnapshot>> {
        if !self.schedule.is_due(now) {
            return None;
        }
        self.schedule.mark_ran(now);

        let snapshot = Arc::new(self.source.refresh((self.clock)()));
        self.cycles += 1;
        self.latest = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    /// Skip the wait: the next poll runs a cycle.
    pub fn refresh_now(&mut self) {
        tracing::info!("manual refresh requested");
        self.schedule.trigger_now();
    }

    /// Replace the audience source with one for `station` and refresh at
    /// the next poll.
    pub fn switch_station(&mut self, station: StationId) {
        if station == self.station() {
            return;
        }
        tracing::info!(
            from = self.station().number(),
            to = station.number(),
            "switching station"
        );
        self.source = (self.factory)(station);
        self.schedule.trigger_now();
    }

    /// Set the refresh interval, rejecting values outside 10..=60 seconds.
    pub fn set_refresh_secs(&mut self, secs: u64) -> Result<()> {
        validate_refresh_secs(secs)?;
        self.schedule.set_interval(Duration::from_secs(secs));
        tracing::info!(refresh_secs = secs, "refresh interval changed");
        Ok(())
    }

    /// Nudge the interval by `delta` seconds, clamped to the valid range.
    pub fn adjust_refresh_secs(&mut self, delta: i64) -> u64 {
        let current = self.refresh_secs() as i64;
        let secs = (current + delta).clamp(MIN_REFRESH_SECS as i64, MAX_REFRESH_SECS as i64) as u64;
        if secs != self.refresh_secs() {
            self.schedule.set_interval(Duration::from_secs(secs));
            tracing::info!(refresh_secs = secs, "refresh interval changed");
        }
        secs
    }
}

/// Factory for synthetic generators. With a seed every station gets its
/// own deterministic stream.
pub fn generator_factory(seed: Option<u64>, clock: Clock) -> SourceFactory {
    Box::new(move |station| -> Box<dyn AudienceSource> {
        match seed {
            Some(seed) => Box::new(MetricsGenerator::with_seed(
                station,
                seed ^ u64::from(station.number()),
                clock(),
            )),
            None => Box::new(MetricsGenerator::new(station)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seven_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    fn session(station: StationId) -> DashboardSession {
        DashboardSession::with_factory(
            station,
            generator_factory(Some(99), seven_am),
            Duration::from_secs(30),
            seven_am,
        )
    }

    #[test]
    fn first_poll_runs_a_cycle() {
        let mut s = session(StationId::One);
        let snap = s.poll(Instant::now()).unwrap();
        assert_eq!(snap.cycle, 1);
        assert_eq!(snap.program.name, "LE RÉVEIL FREEDOM");
        assert_eq!(s.cycles(), 1);
        assert!(s.latest().is_some());
    }

    #[test]
    fn poll_waits_for_interval() {
        let mut s = session(StationId::One);
        let t0 = Instant::now();
        assert!(s.poll(t0).is_some());
        assert!(s.poll(t0 + Duration::from_secs(10)).is_none());
        assert!(s.poll(t0 + Duration::from_secs(30)).is_some());
        assert_eq!(s.cycles(), 2);
    }

    #[test]
    fn refresh_now_skips_the_wait() {
        let mut s = session(StationId::Two);
        let t0 = Instant::now();
        s.poll(t0);
        s.refresh_now();
        let snap = s.poll(t0 + Duration::from_millis(5)).unwrap();
        assert_eq!(snap.cycle, 2);
    }

    #[test]
    fn switching_station_rebuilds_source() {
        let mut s = session(StationId::One);
        let t0 = Instant::now();
        s.poll(t0);
        s.switch_station(StationId::Two);
        assert_eq!(s.station(), StationId::Two);
        let snap = s.poll(t0 + Duration::from_millis(1)).unwrap();
        assert_eq!(snap.station.id, StationId::Two);
        assert_eq!(snap.cycle, 1);
        assert_eq!(snap.program.name, "FREEDOM 2 MATIN");
    }

    #[test]
    fn refresh_rate_is_range_checked() {
        let mut s = session(StationId::One);
        assert!(s.set_refresh_secs(9).is_err());
        assert!(s.set_refresh_secs(61).is_err());
        s.set_refresh_secs(10).unwrap();
        assert_eq!(s.refresh_secs(), 10);
    }

    #[test]
    fn adjust_clamps() {
        let mut s = session(StationId::One);
        assert_eq!(s.adjust_refresh_secs(5), 35);
        assert_eq!(s.adjust_refresh_secs(100), 60);
        assert_eq!(s.adjust_refresh_secs(-100), 10);
    }

    #[test]
    fn from_config_rejects_bad_station() {
        let config = DashboardConfig {
            station: 4,
            ..DashboardConfig::default()
        };
        let err = DashboardSession::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("invalid station id 4"));
    }

    #[test]
    fn seeded_sessions_agree() {
        let mut a = session(StationId::One);
        let mut b = session(StationId::One);
        let t0 = Instant::now();
        let sa = a.poll(t0).unwrap();
        let sb = b.poll(t0).unwrap();
        assert_eq!(sa.live, sb.live);
        assert_eq!(sa.technical, sb.technical);
    }
}
