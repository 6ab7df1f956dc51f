use ratatui::{layout::Rect, Frame};

/// Hero-area drawing for a panel.
///
/// Implemented next to `freedom_core::module::Module`; the app pairs the two
/// at registration time through `Any` downcasting, so the core crate never
/// sees a ratatui type.
pub trait HeroRenderer {
    fn render_hero(&self, f: &mut Frame, area: Rect);
}
