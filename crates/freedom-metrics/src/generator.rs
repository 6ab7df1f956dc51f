use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, Timelike};

use crate::geo::GeoDistribution;
use crate::history::{DayPart, HistoricalSeries, LISTENER_FLOOR};
use crate::monitoring::TechnicalStatus;
use crate::schedule::{slot_for_hour, ProgramSlot, ScheduleEntry};
use crate::snapshot::{DashboardSnapshot, EngagementPoint, LiveSnapshot, MetricDeltas, SocialActivity};
use crate::social;
use crate::station::{StationId, StationProfile, Trend};
use crate::tracks::top_tracks;

/// Anything that can produce a fresh dashboard snapshot once per cycle.
///
/// [`MetricsGenerator`] fabricates the numbers; a real audience-measurement
/// feed would implement this trait and leave the presentation untouched.
pub trait AudienceSource {
    fn station(&self) -> StationId;

    /// Advance one cycle and return the resulting snapshot.
    fn refresh(&mut self, now: NaiveDateTime) -> DashboardSnapshot;
}

const ENGAGEMENT_POINTS: i64 = 8;
const ENGAGEMENT_STEP_MINUTES: i64 = 30;

/// Synthetic metrics for one station and one session.
pub struct MetricsGenerator {
    profile: &'static StationProfile,
    rng: fastrand::Rng,
    history: Arc<HistoricalSeries>,
    live: LiveSnapshot,
    program: ProgramSlot,
    geo: GeoDistribution,
    cycle: u64,
    last_delta: i64,
}

impl MetricsGenerator {
    /// Wall-clock, unseeded generator.
    pub fn new(station: StationId) -> Self {
        Self::with_rng(station, Local::now().naive_local(), fastrand::Rng::new())
    }

    /// Deterministic generator: same seed and `now` give the same history
    /// and the same sequence of refreshes.
    pub fn with_seed(station: StationId, seed: u64, now: NaiveDateTime) -> Self {
        Self::with_rng(station, now, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(station: StationId, now: NaiveDateTime, mut rng: fastrand::Rng) -> Self {
        let profile = station.profile();
        let history = HistoricalSeries::generate(station, now, &mut rng);
        let live = LiveSnapshot {
            current_listeners: profile.initial_listeners,
            peak_today: profile.initial_peak,
            trend: profile.initial_trend,
            devices: profile.devices,
        };
        let program = ProgramSlot::from_entry(
            slot_for_hour(now.hour(), station),
            live.current_listeners,
        );

        tracing::debug!(
            station = station.number(),
            samples = history.len(),
            "metrics generator constructed"
        );

        Self {
            profile,
            rng,
            history: Arc::new(history),
            live,
            program,
            geo: GeoDistribution::new(),
            cycle: 0,
            last_delta: 0,
        }
    }

    pub fn profile(&self) -> &'static StationProfile {
        self.profile
    }

    pub fn live(&self) -> &LiveSnapshot {
        &self.live
    }

    pub fn program(&self) -> &ProgramSlot {
        &self.program
    }

    pub fn geo(&self) -> &GeoDistribution {
        &self.geo
    }

    pub fn history(&self) -> &HistoricalSeries {
        &self.history
    }

    /// Random swing drawn by the most recent cycle.
    pub fn last_delta(&self) -> i64 {
        self.last_delta
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Mutate the live figures, localities and program for `now`.
    ///
    /// Both the time-of-day factor and the random swing are taken from the
    /// station's reference audience, so each cycle is a fresh draw around
    /// the day-part level rather than a compounding walk.
    fn update_live(&mut self, now: NaiveDateTime) {
        let part = DayPart::for_hour(now.hour());
        let reference = self.profile.initial_listeners;

        let bound = swing_bound(reference, part);
        let delta = self.rng.i64(-bound..=bound);
        let next = listeners_for(reference, part, delta);

        self.live.current_listeners = next;
        self.live.peak_today = self.live.peak_today.max(next);
        self.live.trend = Trend::from_delta(delta);
        self.last_delta = delta;

        self.geo.perturb(&mut self.rng);

        let entry = slot_for_hour(now.hour(), self.profile.id);
        self.program = ProgramSlot::from_entry(entry, next);
    }

    fn draw_deltas(&mut self) -> MetricDeltas {
        let listeners = self.rng.i32(-800..=800);
        let mobile = self.rng.i32(-1..=1);
        let engagement = self.rng.i32(-2..=2);
        MetricDeltas {
            listeners: (listeners.abs() > 200).then_some(listeners),
            mobile: (mobile != 0).then_some(mobile),
            engagement: (engagement != 0).then_some(engagement),
        }
    }

    fn draw_engagement_curve(&mut self, now: NaiveDateTime) -> Vec<EngagementPoint> {
        let entry = slot_for_hour(now.hour(), self.profile.id);
        let start = show_start(entry, now);
        let base = i32::from(self.program.engagement);

        (0..ENGAGEMENT_POINTS)
            .map(|i| EngagementPoint {
                time: start + Duration::minutes(i * ENGAGEMENT_STEP_MINUTES),
                engagement: (base + self.rng.i32(-8..=8)).clamp(60, 95) as u8,
            })
            .collect()
    }

    fn draw_social_activity(&mut self) -> SocialActivity {
        SocialActivity {
            facebook: self.rng.u32(1_500..=4_000),
            instagram: self.rng.u32(800..=2_500),
            website: self.rng.u32(2_000..=6_000),
            mobile_app: self.rng.u32(3_500..=8_000),
        }
    }
}

impl AudienceSource for MetricsGenerator {
    fn station(&self) -> StationId {
        self.profile.id
    }

    fn refresh(&mut self, now: NaiveDateTime) -> DashboardSnapshot {
        self.update_live(now);
        self.cycle += 1;

        let deltas = self.draw_deltas();
        let engagement_curve = self.draw_engagement_curve(now);
        let social = self.draw_social_activity();
        let technical = TechnicalStatus::sample(&mut self.rng);
        let new_message = social::maybe_arrival(&mut self.rng, now);

        tracing::debug!(
            station = self.profile.id.number(),
            cycle = self.cycle,
            listeners = self.live.current_listeners,
            peak = self.live.peak_today,
            trend = ?self.live.trend,
            "refresh cycle complete"
        );

        DashboardSnapshot {
            station: self.profile,
            cycle: self.cycle,
            generated_at: now,
            live: self.live.clone(),
            program: self.program.clone(),
            engagement_curve,
            tracks: top_tracks(self.profile.id),
            geo: self.geo.clone(),
            history: Arc::clone(&self.history),
            deltas,
            social,
            technical,
            new_message,
        }
    }
}

/// Largest random swing for a cycle in `part`: `trunc(reference × volatility)`.
pub fn swing_bound(reference: u32, part: DayPart) -> i64 {
    (f64::from(reference) * part.volatility()) as i64
}

/// `max(15 000, round(reference × factor + delta))`.
pub fn listeners_for(reference: u32, part: DayPart, delta: i64) -> u32 {
    let next = (f64::from(reference) * part.factor() + delta as f64).round() as i64;
    next.clamp(LISTENER_FLOOR, i64::from(u32::MAX)) as u32
}

/// Start of the airing of `entry` that contains `now`. The overnight slot
/// seen before its end hour started the previous evening.
fn show_start(entry: &ScheduleEntry, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_hms_opt(entry.start_hour, 0, 0).unwrap_or(now);
    if entry.wraps_midnight() && now.hour() < entry.end_hour {
        today - Duration::days(1)
    } else {
        today
    }
}
