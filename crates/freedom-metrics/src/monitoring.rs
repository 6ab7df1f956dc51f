//! Simulated broadcast-chain health figures.

use serde::Serialize;

use crate::station::ISLAND_STATS;

/// Samples kept in the server-load series.
const LOAD_SAMPLES: usize = 10;
/// Load at which the gauge raises its alert marker.
pub const LOAD_ALERT_THRESHOLD: u8 = 85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LatencyStatus {
    Good,
    Average,
    High,
}

impl LatencyStatus {
    pub fn from_ms(latency_ms: u16) -> Self {
        if latency_ms < 80 {
            LatencyStatus::Good
        } else if latency_ms < 110 {
            LatencyStatus::Average
        } else {
            LatencyStatus::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LatencyStatus::Good => "Bon",
            LatencyStatus::Average => "Moyen",
            LatencyStatus::High => "Élevé",
        }
    }
}

/// Coloured band of the server-load gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBand {
    Normal,
    Elevated,
    Critical,
}

impl LoadBand {
    pub fn for_load(load: u8) -> Self {
        match load {
            0..=49 => LoadBand::Normal,
            50..=79 => LoadBand::Elevated,
            _ => LoadBand::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalStatus {
    pub stream_quality: u8,
    pub latency_ms: u16,
    pub latency_status: LatencyStatus,
    pub transmitters_online: u8,
    pub transmitters_total: u8,
    pub bandwidth_mbps: u16,
    pub server_load: Vec<u8>,
}

impl TechnicalStatus {
    pub fn sample(rng: &mut fastrand::Rng) -> Self {
        let latency_ms = rng.u16(40..=120);
        Self {
            stream_quality: rng.u8(97..=100),
            latency_ms,
            latency_status: LatencyStatus::from_ms(latency_ms),
            transmitters_online: ISLAND_STATS.transmitters_online,
            transmitters_total: ISLAND_STATS.transmitters_total,
            bandwidth_mbps: rng.u16(150..=300),
            server_load: (0..LOAD_SAMPLES).map(|_| rng.u8(35..=75)).collect(),
        }
    }

    /// Latest server load in percent.
    pub fn load(&self) -> u8 {
        self.server_load.last().copied().unwrap_or(0)
    }

    /// Change between the two most recent load samples.
    pub fn load_delta(&self) -> i16 {
        match self.server_load.as_slice() {
            [.., prev, last] => i16::from(*last) - i16::from(*prev),
            _ => 0,
        }
    }
}
