//! Synthetic audience metrics for the Freedom Radio Réunion dashboard.
//!
//! [`MetricsGenerator`] owns every piece of simulated state (listeners,
//! locality breakdown, current program, history) and mutates it once per
//! refresh cycle, producing a [`DashboardSnapshot`] for the presentation
//! layer. The [`AudienceSource`] trait is the seam a real telemetry adapter
//! would implement instead.
//!
//! Nothing in this crate touches the terminal.

pub mod format;
pub mod generator;
pub mod geo;
pub mod history;
pub mod monitoring;
pub mod schedule;
pub mod snapshot;
pub mod social;
pub mod station;
pub mod tracks;

pub use generator::{AudienceSource, MetricsGenerator};
pub use snapshot::DashboardSnapshot;
pub use station::{StationError, StationId, StationProfile, Trend};
