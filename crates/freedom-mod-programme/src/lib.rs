use std::any::Any;
use std::sync::Arc;

use ratatui::{layout::Rect, Frame};

use freedom_core::{
    event::Event,
    module::{HudContribution, Module},
};
use freedom_metrics::DashboardSnapshot;
use freedom_ui::renderer::HeroRenderer;

pub mod render;

/// Show on air, its engagement curve and the station's top list.
#[derive(Default)]
pub struct ProgrammePanel {
    latest: Option<Arc<DashboardSnapshot>>,
}

impl ProgrammePanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for ProgrammePanel {
    fn id(&self) -> &'static str {
        "programme"
    }

    fn title(&self) -> &'static str {
        "Programme"
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
        let mut right_lines = vec![
            format!("{}-{}", snap.program.start_time, snap.program.end_time),
            format!("avec {}", snap.program.host),
        ];
        if let Some(first) = snap.tracks.first() {
            right_lines.push(format!("n°1 {}", first.artist));
        }
        HudContribution {
            left_lines: vec![snap.program.name.to_string()],
            right_lines,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HeroRenderer for ProgrammePanel {
    fn render_hero(&self, f: &mut Frame, area: Rect) {
        render::render_programme(f, area, self.latest.as_deref());
    }
}
