use std::any::Any;

use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{layout::Rect, widgets::ListState, Frame};

use freedom_core::{
    event::Event,
    module::{HudContribution, Module},
};
use freedom_metrics::format::format_count;
use freedom_metrics::snapshot::SocialActivity;
use freedom_metrics::social::SocialFeed;
use freedom_ui::renderer::HeroRenderer;

pub mod render;

/// Live listener feed.
///
/// The feed is seeded from the first snapshot and then lives for the
/// whole session: station switches keep it, and likes accumulate on it.
#[derive(Default)]
pub struct SocialPanel {
    feed: Option<SocialFeed>,
    selection: ListState,
    /// Time of the last snapshot; message ages are measured against it.
    as_of: Option<NaiveDateTime>,
    activity: Option<SocialActivity>,
}

impl SocialPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self) -> Option<&SocialFeed> {
        self.feed.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    fn select_step(&mut self, down: bool) {
        let Some(len) = self.feed.as_ref().map(SocialFeed::visible_len) else {
            return;
        };
        if len == 0 {
            return;
        }
        let next = match (self.selection.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.selection.select(Some(next));
    }

    fn like_selected(&mut self) {
        let (Some(feed), Some(idx)) = (self.feed.as_mut(), self.selection.selected()) else {
            return;
        };
        if let Some(likes) = feed.like(idx) {
            tracing::info!(target: "social", index = idx, likes, "message liked");
        }
    }
}

impl Module for SocialPanel {
    fn id(&self) -> &'static str {
        "social"
    }

    fn title(&self) -> &'static str {
        "Social"
    }

    fn handle_event(&mut self, ev: &Event) {
        match ev {
            Event::Snapshot(snap) => {
                let feed = self
                    .feed
                    .get_or_insert_with(|| SocialFeed::seeded(snap.generated_at));
                if let Some(message) = &snap.new_message {
                    tracing::debug!(target: "social", author = %message.author, "new message");
                    feed.push(message.clone());
                }
                self.as_of = Some(snap.generated_at);
                self.activity = Some(snap.social);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.select_step(true),
                KeyCode::Up | KeyCode::Char('k') => self.select_step(false),
                KeyCode::Enter | KeyCode::Char('l') => self.like_selected(),
                _ => {}
            },
            _ => {}
        }
    }

    fn hud(&self) -> HudContribution {
        let Some(feed) = &self.feed else {
            return HudContribution::default();
        };
        let mut right_lines = vec![format!("{} messages", feed.len())];
        if let Some(activity) = self.activity {
            let total: u64 = activity
                .entries()
                .iter()
                .map(|&(_, n)| u64::from(n))
                .sum();
            right_lines.push(format!("{} interactions", format_count(total)));
        }
        HudContribution {
            left_lines: vec!["↑↓ choisir".into(), "l / Entrée aimer".into()],
            right_lines,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HeroRenderer for SocialPanel {
    fn render_hero(&self, f: &mut Frame, area: Rect) {
        let mut selection = self.selection.clone();
        render::render_social(f, area, self.feed.as_ref(), self.as_of, &mut selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use freedom_metrics::social::SocialMessage;
    use freedom_metrics::{AudienceSource, DashboardSnapshot, MetricsGenerator, StationId};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    fn snapshot(minute: u32, message: Option<SocialMessage>) -> Event {
        let mut snap: DashboardSnapshot =
            MetricsGenerator::with_seed(StationId::One, 6, at(minute)).refresh(at(minute));
        snap.new_message = message;
        Event::Snapshot(Arc::new(snap))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn first_snapshot_seeds_feed() {
        let mut panel = SocialPanel::new();
        assert!(panel.feed().is_none());
        panel.handle_event(&snapshot(0, None));
        assert_eq!(panel.feed().unwrap().len(), 6);
        assert_eq!(panel.hud().right_lines[0], "6 messages");
    }

    #[test]
    fn arrivals_are_pushed_on_top() {
        let mut panel = SocialPanel::new();
        panel.handle_event(&snapshot(0, None));
        let msg = SocialMessage::new("Ti_Creole", "Qui écoute Freedom au boulot ?", 20, at(1));
        panel.handle_event(&snapshot(1, Some(msg)));
        let feed = panel.feed().unwrap();
        assert_eq!(feed.len(), 7);
        assert_eq!(feed.visible().next().unwrap().author, "Ti_Creole");
    }

    #[test]
    fn selection_is_clamped_to_visible_rows() {
        let mut panel = SocialPanel::new();
        panel.handle_event(&key(KeyCode::Down));
        assert_eq!(panel.selected(), None);

        panel.handle_event(&snapshot(0, None));
        panel.handle_event(&key(KeyCode::Down));
        assert_eq!(panel.selected(), Some(0));
        for _ in 0..10 {
            panel.handle_event(&key(KeyCode::Char('j')));
        }
        assert_eq!(panel.selected(), Some(5));
        panel.handle_event(&key(KeyCode::Up));
        assert_eq!(panel.selected(), Some(4));
    }

    #[test]
    fn likes_persist_across_snapshots() {
        let mut panel = SocialPanel::new();
        panel.handle_event(&snapshot(0, None));
        panel.handle_event(&key(KeyCode::Down));
        panel.handle_event(&key(KeyCode::Char('l')));
        panel.handle_event(&key(KeyCode::Enter));
        panel.handle_event(&snapshot(1, None));
        let first = panel.feed().unwrap().visible().next().unwrap();
        assert_eq!(first.author, "Marie_StDenis");
        assert_eq!(first.likes, 44);
    }

    #[test]
    fn like_without_selection_does_nothing() {
        let mut panel = SocialPanel::new();
        panel.handle_event(&snapshot(0, None));
        panel.handle_event(&key(KeyCode::Char('l')));
        assert_eq!(panel.feed().unwrap().visible().next().unwrap().likes, 42);
    }
}
