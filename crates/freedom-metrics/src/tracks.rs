use serde::Serialize;

use crate::station::{StationId, Trend};

/// A ranked entry in the station's current top list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackEntry {
    pub artist: &'static str,
    pub title: &'static str,
    pub plays: u32,
    pub trend: Trend,
}

const fn track(artist: &'static str, title: &'static str, plays: u32, trend: Trend) -> TrackEntry {
    TrackEntry {
        artist,
        title,
        plays,
        trend,
    }
}

// Local artists lead on Freedom 1.
const TOP_1: [TrackEntry; 8] = [
    track("GABRIEL ZACCAI", "LA RÉUNION", 45, Trend::Up),
    track("KAF MARON", "MARMITE", 42, Trend::Stable),
    track("DANYÈL WARO", "SOMMIN KARÉ", 38, Trend::Up),
    track("ZISKAKAN", "BOUT D'MON ÎLE", 35, Trend::Down),
    track("NATHALIE NATIEMBÉ", "KASKAS NOU LA", 32, Trend::Up),
    track("BASTERS", "MAMY LAO", 30, Trend::Up),
    track("GRUP LÉLÉ", "SÉGA TROIS FLEURS", 28, Trend::Stable),
    track("LOÏC BENJAMIN", "DANMON LÉVÉ", 25, Trend::Up),
];

// Freedom 2 leans international.
const TOP_2: [TrackEntry; 8] = [
    track("DAVID GUETTA", "I'M GOOD", 48, Trend::Up),
    track("MILEY CYRUS", "FLOWERS", 42, Trend::Stable),
    track("SIA", "UNSTOPPABLE", 39, Trend::Up),
    track("THE WEEKND", "BLINDING LIGHTS", 36, Trend::Down),
    track("DUA LIPA", "DANCE THE NIGHT", 34, Trend::Up),
    track("ED SHEERAN", "EYES CLOSED", 31, Trend::Up),
    track("KAF MARON", "LA ROUTE DU BONHEUR", 28, Trend::Stable),
    track("GABRIEL ZACCAI", "MON ÎLE ADORÉE", 26, Trend::Up),
];

/// The station's static top list, most played first.
pub fn top_tracks(station: StationId) -> &'static [TrackEntry] {
    match station {
        StationId::One => &TOP_1,
        StationId::Two => &TOP_2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_ranked_by_plays() {
        for station in StationId::ALL {
            let tracks = top_tracks(station);
            assert_eq!(tracks.len(), 8);
            assert!(tracks.windows(2).all(|w| w[0].plays >= w[1].plays));
        }
    }

    #[test]
    fn stations_have_distinct_lists() {
        assert_eq!(top_tracks(StationId::One)[0].artist, "GABRIEL ZACCAI");
        assert_eq!(top_tracks(StationId::Two)[0].artist, "DAVID GUETTA");
    }
}
