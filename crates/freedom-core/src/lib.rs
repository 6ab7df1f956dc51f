//! Core infrastructure for the Freedom dashboard.
//!
//! This crate provides the building blocks shared by the application shell
//! and every dashboard panel: the per-session refresh cycle, an event bus,
//! panel registry, drop-down console, command system and logging subsystem.

pub mod bus;
pub mod command;
pub mod console;
pub mod event;
pub mod logging;
pub mod module;
pub mod registry;
pub mod schedule;
pub mod session;
pub mod state;
