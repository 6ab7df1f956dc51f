use std::any::Any;
use std::sync::Arc;

use ratatui::{layout::Rect, Frame};

use freedom_core::{
    event::Event,
    module::{HudContribution, Module},
};
use freedom_metrics::format::{format_count, format_signed};
use freedom_metrics::station::ISLAND_STATS;
use freedom_metrics::DashboardSnapshot;
use freedom_ui::renderer::HeroRenderer;

pub mod render;

/// Live audience panel: headline metrics and the six-hour chart.
#[derive(Default)]
pub struct LivePanel {
    latest: Option<Arc<DashboardSnapshot>>,
}

impl LivePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&DashboardSnapshot> {
        self.latest.as_deref()
    }
}

impl Module for LivePanel {
    fn id(&self) -> &'static str {
        "live"
    }

    fn title(&self) -> &'static str {
        "Audience"
    }

    fn handle_event(&mut self, ev: &Event) {
        if let Event::Snapshot(snap) = ev {
            self.latest = Some(Arc::clone(snap));
        }
    }

    fn hud(&self) -> HudContribution {
        let Some(snap) = self.latest() else {
            return HudContribution::default();
        };
        let live = &snap.live;
        HudContribution {
            left_lines: vec![
                format!("cycle {}", snap.cycle),
                format!("tendance {}", live.trend.arrow()),
            ],
            right_lines: vec![
                format!("{} auditeurs", format_count(u64::from(live.current_listeners))),
                format!("pic {}", format_count(u64::from(live.peak_today))),
                match snap.deltas.listeners {
                    Some(d) => format!("variation {}", format_signed(i64::from(d))),
                    None => "variation stable".to_string(),
                },
                format!(
                    "île {} · {}%",
                    format_count(u64::from(ISLAND_STATS.total_listeners)),
                    ISLAND_STATS.coverage_percent
                ),
            ],
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HeroRenderer for LivePanel {
    fn render_hero(&self, f: &mut Frame, area: Rect) {
        render::render_live(f, area, self.latest());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use freedom_metrics::{AudienceSource, MetricsGenerator, StationId};

    fn snapshot() -> Arc<DashboardSnapshot> {
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        Arc::new(MetricsGenerator::with_seed(StationId::One, 5, now).refresh(now))
    }

    #[test]
    fn keeps_latest_snapshot() {
        let mut panel = LivePanel::new();
        assert!(panel.latest().is_none());
        assert!(panel.hud().right_lines.is_empty());

        let snap = snapshot();
        panel.handle_event(&Event::Snapshot(Arc::clone(&snap)));
        assert_eq!(panel.latest().unwrap().cycle, 1);

        let hud = panel.hud();
        assert_eq!(hud.left_lines[0], "cycle 1");
        assert!(hud.right_lines[0].ends_with("auditeurs"));
        assert_eq!(hud.right_lines[3], "île 157 900 · 100%");
    }

    #[test]
    fn ignores_other_events() {
        let mut panel = LivePanel::new();
        panel.handle_event(&Event::Resize { cols: 80, rows: 24 });
        assert!(panel.latest().is_none());
        assert_eq!(panel.id(), "live");
    }
}
