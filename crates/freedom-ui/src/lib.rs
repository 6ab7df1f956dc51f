//! Terminal presentation for the Freedom dashboard.
//!
//! Layout, shell chrome (header band, HUD, status bar), the console overlay
//! and the dove mascot. Panels draw their own hero area through
//! [`renderer::HeroRenderer`]; all state lives in [`freedom_core`].

pub mod console;
pub mod dove;
pub mod layout;
pub mod renderer;
pub mod shell;
pub mod theme;
