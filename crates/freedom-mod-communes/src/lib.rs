use std::any::Any;
use std::sync::Arc;

use ratatui::{layout::Rect, Frame};

use freedom_core::{
    event::Event,
    module::{HudContribution, Module},
};
use freedom_metrics::format::{format_count, format_percent};
use freedom_metrics::DashboardSnapshot;
use freedom_ui::renderer::HeroRenderer;

pub mod render;

/// Listener breakdown by commune and by listening device.
#[derive(Default)]
pub struct CommunesPanel {
    latest: Option<Arc<DashboardSnapshot>>,
}

impl CommunesPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for CommunesPanel {
    fn id(&self) -> &'static str {
        "communes"
    }

    fn title(&self) -> &'static str {
        "Communes"
    }

    fn handle_event(&mut self, ev: &Event) {
        if let Event::Snapshot(snap) = ev {
            self.latest = Some(Arc::clone(snap));
        }
    }

    fn hud(&self) -> HudContribution {
        let Some(snap) = self.latest.as_deref() else {
            return HudContribution::default();
        };
        let geo = &snap.geo;
        let mut right_lines = vec![format!("{} communes", geo.len())];
        right_lines.push(format!("total {}", format_count(geo.total())));
        if let Some(leader) = geo.top(1).first() {
            right_lines.push(format!(
                "1. {} {}",
                leader.name,
                format_percent(geo.share_percent(leader.listeners))
            ));
        }
        HudContribution {
            left_lines: vec![format!("mobile {}%", snap.live.devices.mobile)],
            right_lines,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HeroRenderer for CommunesPanel {
    fn render_hero(&self, f: &mut Frame, area: Rect) {
        render::render_communes(f, area, self.latest.as_deref());
    }
}
