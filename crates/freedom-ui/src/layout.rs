use ratatui::layout::{Constraint, Layout, Rect};

/// Screen regions of the dashboard, top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct DashboardRects {
    /// Header band: station name, panel tabs, clock.
    pub header: Rect,
    pub hero: Rect,
    pub hud: Rect,
    pub hud_left: Rect,
    pub hud_face: Rect,
    pub hud_right: Rect,
    /// On-air line and refresh countdown.
    pub status: Rect,
}

pub const HEADER_HEIGHT: u16 = 3;

/// Split `area` into header, hero, HUD and status rows.
///
/// The HUD keeps at least five rows and never crowds out the header and
/// status bar; the face column shrinks on narrow terminals.
pub fn dashboard_layout(area: Rect, hud_height: u16, face_width: u16) -> DashboardRects {
    let room = area.height.saturating_sub(HEADER_HEIGHT + 2);
    let hud_height = hud_height.min(room).max(5.min(room));
    let [header, hero, hud, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(hud_height),
        Constraint::Length(1),
    ])
    .areas(area);

    let face_width = face_width.min(hud.width / 3);
    let [hud_left, hud_face, hud_right] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(face_width),
        Constraint::Fill(1),
    ])
    .areas(hud);

    DashboardRects {
        header,
        hero,
        hud,
        hud_left,
        hud_face,
        hud_right,
        status,
    }
}
