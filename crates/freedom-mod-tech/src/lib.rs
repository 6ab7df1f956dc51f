use std::any::Any;
use std::sync::Arc;

use ratatui::{layout::Rect, Frame};

use freedom_core::{
    event::Event,
    module::{HudContribution, Module},
};
use freedom_metrics::monitoring::LOAD_ALERT_THRESHOLD;
use freedom_metrics::DashboardSnapshot;
use freedom_ui::renderer::HeroRenderer;

pub mod render;

#[derive(Default)]
pub struct TechPanel {
    latest: Option<Arc<DashboardSnapshot>>,
}

impl TechPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for TechPanel {
    fn id(&self) -> &'static str {
        "tech"
    }

    fn title(&self) -> &'static str {
        "Technique"
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
        let tech = &snap.technical;
        let mut left_lines = vec![format!("latence {}", tech.latency_status.label())];
        if tech.load() >= LOAD_ALERT_THRESHOLD {
            left_lines.push("charge serveur en alerte".into());
        }
        HudContribution {
            left_lines,
            right_lines: vec![
                format!("charge {}%", tech.load()),
                format!(
                    "émetteurs {}/{}",
                    tech.transmitters_online, tech.transmitters_total
                ),
            ],
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HeroRenderer for TechPanel {
    fn render_hero(&self, f: &mut Frame, area: Rect) {
        render::render_tech(f, area, self.latest.as_deref().map(|s| &s.technical));
    }
}
