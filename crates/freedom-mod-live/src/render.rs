//! Hero rendering for the live panel: five metric cards over a two-row
//! chart of the last six hours.

use chrono::Duration;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use freedom_metrics::format::{format_count, format_rank};
use freedom_metrics::DashboardSnapshot;
use freedom_ui::theme::{self, ACCENT, MUTED, SKY};

/// Hours of history shown in the chart.
pub const CHART_WINDOW_HOURS: i64 = 6;

const ENGAGEMENT_BOUNDS: [f64; 2] = [60.0, 100.0];

/// Chart series as `(minutes before the snapshot, value)` pairs: the
/// trailing history window followed by the current cycle's point at 0.
pub struct ChartSeries {
    pub listeners: Vec<(f64, f64)>,
    pub engagement: Vec<(f64, f64)>,
}

impl ChartSeries {
    pub fn from_snapshot(snap: &DashboardSnapshot) -> Self {
        let now = snap.generated_at;
        let recent = snap
            .history
            .since(now - Duration::hours(CHART_WINDOW_HOURS));
        let x = |t: chrono::NaiveDateTime| (t - now).num_minutes() as f64;

        let mut listeners: Vec<(f64, f64)> = recent
            .iter()
            .filter(|s| s.timestamp <= now)
            .map(|s| (x(s.timestamp), f64::from(s.listeners)))
            .collect();
        let mut engagement: Vec<(f64, f64)> = recent
            .iter()
            .filter(|s| s.timestamp <= now)
            .map(|s| (x(s.timestamp), f64::from(s.engagement)))
            .collect();

        listeners.push((0.0, f64::from(snap.live.current_listeners)));
        engagement.push((0.0, f64::from(snap.program.engagement)));
        Self {
            listeners,
            engagement,
        }
    }

    /// Y bounds for the listener row, padded and rounded to thousands.
    pub fn listener_bounds(&self) -> [f64; 2] {
        let (lo, hi) = self
            .listeners
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        if lo > hi {
            return [0.0, 1.0];
        }
        let lo = ((lo * 0.95) / 1000.0).floor() * 1000.0;
        let hi = ((hi * 1.05) / 1000.0).ceil() * 1000.0;
        [lo, hi.max(lo + 1000.0)]
    }
}

pub fn render_live(f: &mut Frame, area: Rect, snap: Option<&DashboardSnapshot>) {
    let block = theme::card("AUDIENCE LIVE RÉUNION");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(snap) = snap else {
        f.render_widget(
            Paragraph::new("En attente du premier cycle...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED)),
            inner,
        );
        return;
    };

    let [cards, chart] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(inner);
    render_cards(f, cards, snap);
    if chart.height >= 6 {
        render_charts(f, chart, snap);
    }
}

fn render_cards(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let live = &snap.live;
    let cols = Layout::horizontal([Constraint::Ratio(1, 5); 5]).split(area);

    let mut listeners = vec![Span::styled(
        format_count(u64::from(live.current_listeners)),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    listeners.extend(theme::delta_badge(snap.deltas.listeners, ""));

    let mut mobile = vec![Span::styled(
        format!("{}%", live.devices.mobile),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    mobile.extend(theme::delta_badge(snap.deltas.mobile, "%"));

    let mut engagement = vec![Span::styled(
        format!("{}%", snap.program.engagement),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    engagement.extend(theme::delta_badge(snap.deltas.engagement, "%"));

    let trend = Span::styled(
        format!(" {}", live.trend.arrow()),
        Style::default().fg(theme::trend_color(live.trend)),
    );

    let cards: [(Line, Line); 5] = [
        (
            Line::from(vec![Span::raw("AUDITEURS ACTUELS"), trend]),
            Line::from(listeners),
        ),
        (
            Line::from("PIC DU JOUR"),
            Line::from(Span::styled(
                format_count(u64::from(live.peak_today)),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ),
        (Line::from("ÉCOUTE MOBILE"), Line::from(mobile)),
        (Line::from("ENGAGEMENT"), Line::from(engagement)),
        (
            Line::from("CLASSEMENT ÎLE"),
            Line::from(Span::styled(
                format_rank(snap.station.island_rank),
                Style::default().fg(theme::GOLD).add_modifier(Modifier::BOLD),
            )),
        ),
    ];

    for ((label, value), col) in cards.into_iter().zip(cols.iter()) {
        let card = Paragraph::new(vec![label.style(Style::default().fg(MUTED)), value])
            .block(theme::card(""));
        f.render_widget(card, *col);
    }
}

fn render_charts(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let series = ChartSeries::from_snapshot(snap);
    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(area);

    let x_axis = |title: &'static str| {
        Axis::default()
            .title(title)
            .style(Style::default().fg(MUTED))
            .bounds([-(CHART_WINDOW_HOURS as f64) * 60.0, 0.0])
            .labels(["-6h", "-3h", "maintenant"])
    };

    let listener_bounds = series.listener_bounds();
    let listeners = Chart::new(vec![Dataset::default()
        .name("Auditeurs")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(ACCENT))
        .data(&series.listeners)])
    .block(theme::card(&format!(
        "Évolution des auditeurs {} (6 dernières heures)",
        snap.station.short_name
    )))
    .x_axis(x_axis(""))
    .y_axis(
        Axis::default()
            .style(Style::default().fg(MUTED))
            .bounds(listener_bounds)
            .labels([
                format_count(listener_bounds[0] as u64),
                format_count(listener_bounds[1] as u64),
            ]),
    );
    f.render_widget(listeners, top);

    let engagement = Chart::new(vec![Dataset::default()
        .name("Engagement")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(SKY))
        .data(&series.engagement)])
    .block(theme::card("Taux d'engagement (%)"))
    .x_axis(x_axis("Heure"))
    .y_axis(
        Axis::default()
            .style(Style::default().fg(Color::DarkGray))
            .bounds(ENGAGEMENT_BOUNDS)
            .labels(["60", "80", "100"]),
    );
    f.render_widget(engagement, bottom);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use freedom_metrics::{AudienceSource, MetricsGenerator, StationId};
    use ratatui::{backend::TestBackend, Terminal};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn snapshot(station: StationId) -> DashboardSnapshot {
        MetricsGenerator::with_seed(station, 11, at(8)).refresh(at(8))
    }

    fn screen(width: u16, height: u16, snap: Option<&DashboardSnapshot>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render_live(f, f.area(), snap))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn series_covers_six_hours_plus_current_point() {
        let snap = snapshot(StationId::One);
        let series = ChartSeries::from_snapshot(&snap);
        // 6h of 10-minute samples, inclusive, plus the live point.
        assert_eq!(series.listeners.len(), 37 + 1);
        assert_eq!(series.engagement.len(), series.listeners.len());
        assert_eq!(series.listeners.first().unwrap().0, -360.0);
        let last = *series.listeners.last().unwrap();
        assert_eq!(last, (0.0, f64::from(snap.live.current_listeners)));
        assert_eq!(
            series.engagement.last().unwrap().1,
            f64::from(snap.program.engagement)
        );
    }

    #[test]
    fn listener_bounds_contain_every_point() {
        let series = ChartSeries::from_snapshot(&snapshot(StationId::Two));
        let [lo, hi] = series.listener_bounds();
        assert!(series.listeners.iter().all(|&(_, y)| y >= lo && y <= hi));
        assert_eq!(lo % 1000.0, 0.0);
    }

    #[test]
    fn waiting_message_without_snapshot() {
        let text = screen(80, 20, None);
        assert!(text.contains("En attente du premier cycle"));
    }

    #[test]
    fn cards_show_live_values() {
        let snap = snapshot(StationId::One);
        let text = screen(130, 30, Some(&snap));
        assert!(text.contains("AUDITEURS ACTUELS"));
        assert!(text.contains(&format_count(u64::from(snap.live.current_listeners))));
        assert!(text.contains("PIC DU JOUR"));
        assert!(text.contains("CLASSEMENT ÎLE"));
        assert!(text.contains("1ère"));
        assert!(text.contains("Taux d'engagement"));
    }

    #[test]
    fn short_area_skips_charts() {
        let snap = snapshot(StationId::Two);
        let text = screen(130, 9, Some(&snap));
        assert!(text.contains("2ème"));
        assert!(!text.contains("Taux d'engagement"));
    }

    #[test]
    fn degenerate_area_does_not_panic() {
        let snap = snapshot(StationId::One);
        let _ = screen(2, 2, Some(&snap));
    }
}
