use std::any::Any;

use crate::event::Event;

/// Lines a panel contributes to the HUD strip under the hero area.
#[derive(Default)]
pub struct HudContribution {
    /// Left column: key hints and panel status.
    pub left_lines: Vec<String>,
    /// Right column: headline figures.
    pub right_lines: Vec<String>,
}

/// A dashboard panel.
///
/// Panels are registered with [`crate::registry::ModuleRegistry`] and learn
/// about new data through [`Event::Snapshot`]; they keep whatever they need
/// from the snapshot for drawing. Drawing itself lives in
/// `freedom_ui::renderer::HeroRenderer` so this crate stays free of
/// rendering types.
pub trait Module {
    /// Unique identifier used by the `switch` command (e.g. `"live"`).
    fn id(&self) -> &'static str;

    /// Display name shown in the header band.
    fn title(&self) -> &'static str;

    /// Handle an incoming event. The default ignores everything.
    fn handle_event(&mut self, _ev: &Event) {}

    fn hud(&self) -> HudContribution {
        HudContribution::default()
    }

    /// Return `self` as `&dyn Any` for type-aware rendering.
    fn as_any(&self) -> &dyn Any;
}
