use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::geo::GeoDistribution;
use crate::history::HistoricalSeries;
use crate::monitoring::TechnicalStatus;
use crate::schedule::ProgramSlot;
use crate::social::SocialMessage;
use crate::station::{DeviceShare, StationProfile, Trend};
use crate::tracks::TrackEntry;

/// Live audience figures, mutated every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveSnapshot {
    pub current_listeners: u32,
    /// Non-decreasing for the lifetime of a generator.
    pub peak_today: u32,
    pub trend: Trend,
    pub devices: DeviceShare,
}

/// Small badges shown next to the headline metrics. `None` hides the badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricDeltas {
    pub listeners: Option<i32>,
    pub mobile: Option<i32>,
    pub engagement: Option<i32>,
}

/// One point of the in-show engagement curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementPoint {
    pub time: NaiveDateTime,
    pub engagement: u8,
}

/// Interaction counters per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialActivity {
    pub facebook: u32,
    pub instagram: u32,
    pub website: u32,
    pub mobile_app: u32,
}

impl SocialActivity {
    pub fn entries(&self) -> [(&'static str, u32); 4] {
        [
            ("Facebook", self.facebook),
            ("Instagram", self.instagram),
            ("Site Web", self.website),
            ("App Mobile", self.mobile_app),
        ]
    }
}

/// Everything a refresh cycle exposes for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub station: &'static StationProfile,
    pub cycle: u64,
    pub generated_at: NaiveDateTime,
    pub live: LiveSnapshot,
    pub program: ProgramSlot,
    pub engagement_curve: Vec<EngagementPoint>,
    pub tracks: &'static [TrackEntry],
    pub geo: GeoDistribution,
    #[serde(skip)]
    pub history: Arc<HistoricalSeries>,
    pub deltas: MetricDeltas,
    pub social: SocialActivity,
    pub technical: TechnicalStatus,
    pub new_message: Option<SocialMessage>,
}

impl DashboardSnapshot {
    /// One-line on-air summary for the status bar.
    pub fn on_air_line(&self) -> String {
        format!(
            "{} - Diffusion en cours: {} avec {}",
            self.station.short_name, self.program.name, self.program.host
        )
    }
}
