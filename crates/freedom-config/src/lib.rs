//! Configuration types and loaders for the Freedom dashboard.
//!
//! This crate owns the on-disk configuration schema so the session, the
//! logging subsystem and the binary share a single source of truth.

pub mod dashboard;

pub use dashboard::{DashboardConfig, LoggingConfig};
