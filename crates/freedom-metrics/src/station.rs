use std::fmt;

use serde::Serialize;

/// One of the two Freedom broadcast identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum StationId {
    #[default]
    One = 1,
    Two = 2,
}

impl StationId {
    pub const ALL: [StationId; 2] = [StationId::One, StationId::Two];

    /// Numeric identifier as shown to operators (`1` or `2`).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The fixed audience profile for this station.
    pub fn profile(self) -> &'static StationProfile {
        match self {
            StationId::One => &FREEDOM_1,
            StationId::Two => &FREEDOM_2,
        }
    }
}

impl TryFrom<u8> for StationId {
    type Error = StationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StationId::One),
            2 => Ok(StationId::Two),
            other => Err(StationError::InvalidStation(other)),
        }
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Configuration failures when selecting a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    InvalidStation(u8),
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStation(n) => write!(f, "invalid station id {n}: expected 1 or 2"),
        }
    }
}

impl std::error::Error for StationError {}

/// Direction of the listener count over the last cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Deltas within this band (inclusive) are reported as [`Trend::Stable`].
pub const TREND_THRESHOLD: i64 = 500;

impl Trend {
    pub fn from_delta(delta: i64) -> Self {
        if delta > TREND_THRESHOLD {
            Trend::Up
        } else if delta < -TREND_THRESHOLD {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Stable => "►",
        }
    }
}

/// Share of listeners per listening device, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceShare {
    pub mobile: u8,
    pub car: u8,
    pub home: u8,
}

/// Immutable per-station audience profile.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StationProfile {
    pub id: StationId,
    pub name: &'static str,
    pub short_name: &'static str,
    pub frequency: &'static str,
    pub initial_listeners: u32,
    pub initial_peak: u32,
    pub initial_trend: Trend,
    pub devices: DeviceShare,
    pub island_rank: u8,
}

pub const FREEDOM_1: StationProfile = StationProfile {
    id: StationId::One,
    name: "FREEDOM RADIO RÉUNION 91.9",
    short_name: "Freedom 1",
    frequency: "91.9 FM",
    initial_listeners: 85_600,
    initial_peak: 112_000,
    initial_trend: Trend::Up,
    devices: DeviceShare {
        mobile: 68,
        car: 25,
        home: 7,
    },
    island_rank: 1,
};

pub const FREEDOM_2: StationProfile = StationProfile {
    id: StationId::Two,
    name: "FREEDOM RADIO RÉUNION 2 92.7",
    short_name: "Freedom 2",
    frequency: "92.7 FM",
    initial_listeners: 72_300,
    initial_peak: 89_000,
    initial_trend: Trend::Stable,
    devices: DeviceShare {
        mobile: 75,
        car: 18,
        home: 7,
    },
    island_rank: 2,
};

/// Broadcaster-wide figures shown next to the station selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IslandStats {
    pub total_listeners: u32,
    pub coverage_percent: u8,
    pub transmitters_online: u8,
    pub transmitters_total: u8,
}

pub const ISLAND_STATS: IslandStats = IslandStats {
    total_listeners: 157_900,
    coverage_percent: 100,
    transmitters_online: 12,
    transmitters_total: 12,
};

pub const SLOGAN: &str = "LA RADIO DE LA LIBERTÉ";
pub const HOME_TOWN: &str = "Saint-Denis, La Réunion";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_ids_parse() {
        assert_eq!(StationId::try_from(1), Ok(StationId::One));
        assert_eq!(StationId::try_from(2), Ok(StationId::Two));
    }

    #[test]
    fn invalid_station_is_rejected() {
        let err = StationId::try_from(3).unwrap_err();
        assert_eq!(err, StationError::InvalidStation(3));
        assert!(err.to_string().contains("expected 1 or 2"));
        assert!(StationId::try_from(0).is_err());
    }

    #[test]
    fn trend_thresholds() {
        assert_eq!(Trend::from_delta(501), Trend::Up);
        assert_eq!(Trend::from_delta(500), Trend::Stable);
        assert_eq!(Trend::from_delta(0), Trend::Stable);
        assert_eq!(Trend::from_delta(-500), Trend::Stable);
        assert_eq!(Trend::from_delta(-501), Trend::Down);
    }

    #[test]
    fn device_shares_sum_to_hundred() {
        for id in StationId::ALL {
            let d = id.profile().devices;
            assert_eq!(u32::from(d.mobile) + u32::from(d.car) + u32::from(d.home), 100);
        }
    }

    #[test]
    fn profiles_match_ids() {
        assert_eq!(StationId::One.profile().id, StationId::One);
        assert_eq!(StationId::Two.profile().island_rank, 2);
        assert_eq!(StationId::default(), StationId::One);
    }
}
