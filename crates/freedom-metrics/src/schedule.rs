//! Fixed weekly program grid, keyed by hour of day and station.

use serde::Serialize;

use crate::station::StationId;

/// A program entry from the grid. Names and hosts are static per station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub name: &'static str,
    pub host: &'static str,
    pub start_hour: u32,
    pub end_hour: u32,
    pub engagement: u8,
}

impl ScheduleEntry {
    pub fn start_time(&self) -> String {
        format!("{:02}:00", self.start_hour)
    }

    pub fn end_time(&self) -> String {
        format!("{:02}:00", self.end_hour)
    }

    /// True for the overnight slot, which wraps past midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.end_hour <= self.start_hour
    }
}

/// The program currently on air, with its live audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramSlot {
    pub name: &'static str,
    pub host: &'static str,
    pub start_time: String,
    pub end_time: String,
    pub listeners: u32,
    pub engagement: u8,
}

impl ProgramSlot {
    pub fn from_entry(entry: &ScheduleEntry, listeners: u32) -> Self {
        Self {
            name: entry.name,
            host: entry.host,
            start_time: entry.start_time(),
            end_time: entry.end_time(),
            listeners,
            engagement: entry.engagement,
        }
    }
}

const fn entry(
    name: &'static str,
    host: &'static str,
    start_hour: u32,
    end_hour: u32,
    engagement: u8,
) -> ScheduleEntry {
    ScheduleEntry {
        name,
        host,
        start_hour,
        end_hour,
        engagement,
    }
}

// Row order: morning, late morning, lunch, afternoon, evening, night.
const GRID_1: [ScheduleEntry; 6] = [
    entry("LE RÉVEIL FREEDOM", "JEAN-MARC ET LA TEAM", 6, 9, 85),
    entry("FREEDOM ENTRE NOUS", "STEPHANIE", 9, 12, 78),
    entry("LE FREEDOM DE 12H-15H", "DIDIER", 12, 15, 76),
    entry("DRIVE FREEDOM", "LAURENT", 15, 18, 79),
    entry("FREEDOM NIGHT SHOW", "PATRICE", 18, 21, 83),
    entry("FREEDOM NON STOP", "PLAYLIST AUTOMATISÉE", 21, 6, 65),
];

const GRID_2: [ScheduleEntry; 6] = [
    entry("FREEDOM 2 MATIN", "NADEGE ET GILLES", 6, 9, 82),
    entry("HIT FREEDOM 2", "DAVID", 9, 12, 80),
    entry("FREEDOM 2 ENTRE MIDI", "MARIE-LINE", 12, 15, 74),
    entry("FREEDOM 2 DRIVE", "KEVIN", 15, 18, 81),
    entry("FREEDOM 2 SOIR", "JOHAN", 18, 21, 85),
    entry("FREEDOM 2 NON STOP", "PLAYLIST AUTOMATISÉE", 21, 6, 68),
];

/// The full grid for a station, in broadcast order starting at 06:00.
pub fn grid(station: StationId) -> &'static [ScheduleEntry; 6] {
    match station {
        StationId::One => &GRID_1,
        StationId::Two => &GRID_2,
    }
}

/// Select the slot on air at `hour`.
///
/// The five daytime slots are half-open `[start, end)` intervals; every
/// other hour belongs to the overnight automated playlist.
pub fn slot_for_hour(hour: u32, station: StationId) -> &'static ScheduleEntry {
    let grid = grid(station);
    let row = match hour {
        6..=8 => 0,
        9..=11 => 1,
        12..=14 => 2,
        15..=17 => 3,
        18..=20 => 4,
        _ => 5,
    };
    &grid[row]
}
