//! Listener estimates per Réunion commune.

use serde::Serialize;

/// No locality ever drops below this many listeners.
pub const LOCALITY_FLOOR: i64 = 500;
/// Largest per-cycle swing, as a fraction of the current value.
const LOCALITY_SWING: f64 = 0.05;

const COMMUNES: [(&str, u32); 22] = [
    ("Saint-Denis", 21_500),
    ("Saint-Pierre", 18_200),
    ("Saint-Paul", 15_600),
    ("Le Tampon", 14_200),
    ("Saint-Louis", 9_800),
    ("Le Port", 8_600),
    ("Saint-Joseph", 7_200),
    ("Saint-André", 6_800),
    ("Saint-Benoît", 6_100),
    ("Bras-Panon", 3_800),
    ("Saint-Philippe", 2_900),
    ("Sainte-Marie", 5_200),
    ("Sainte-Suzanne", 4_800),
    ("Sainte-Rose", 3_200),
    ("Les Avirons", 4_100),
    ("Entre-Deux", 3_500),
    ("Étang-Salé", 3_900),
    ("Petite-Île", 3_400),
    ("La Possession", 7_500),
    ("Salazie", 1_800),
    ("Cilaos", 1_600),
    ("Trois-Bassins", 2_700),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locality {
    pub name: &'static str,
    pub listeners: u32,
}

/// Ordered locality table. Order is the fixed commune order, not a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoDistribution {
    localities: Vec<Locality>,
}

impl Default for GeoDistribution {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoDistribution {
    /// The initial commune estimates.
    pub fn new() -> Self {
        Self {
            localities: COMMUNES
                .iter()
                .map(|&(name, listeners)| Locality { name, listeners })
                .collect(),
        }
    }

    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    pub fn len(&self) -> usize {
        self.localities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.localities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.localities
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.listeners)
    }

    pub fn total(&self) -> u64 {
        self.localities.iter().map(|l| u64::from(l.listeners)).sum()
    }

    /// Share of the island total held by `listeners`, in percent.
    pub fn share_percent(&self, listeners: u32) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(listeners) / total as f64 * 100.0
    }

    /// The `n` largest localities, biggest first.
    pub fn top(&self, n: usize) -> Vec<&Locality> {
        let mut sorted: Vec<&Locality> = self.localities.iter().collect();
        sorted.sort_by(|a, b| b.listeners.cmp(&a.listeners));
        sorted.truncate(n);
        sorted
    }

    /// All localities, smallest first.
    pub fn ascending(&self) -> Vec<&Locality> {
        let mut sorted: Vec<&Locality> = self.localities.iter().collect();
        sorted.sort_by_key(|l| l.listeners);
        sorted
    }

    /// Perturb every locality independently by up to ±5%, floored.
    pub fn perturb(&mut self, rng: &mut fastrand::Rng) {
        for locality in &mut self.localities {
            let current = i64::from(locality.listeners);
            let bound = (current as f64 * LOCALITY_SWING) as i64;
            let variation = rng.i64(-bound..=bound);
            locality.listeners = (current + variation).max(LOCALITY_FLOOR) as u32;
        }
    }
}
