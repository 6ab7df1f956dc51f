use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};

use freedom_metrics::format::format_count;
use freedom_metrics::snapshot::{EngagementPoint, SocialActivity};
use freedom_metrics::tracks::TrackEntry;
use freedom_metrics::DashboardSnapshot;
use freedom_ui::theme::{self, ACCENT, GOLD, MUTED, SKY};

const CURVE_BOUNDS: [f64; 2] = [60.0, 100.0];

/// `(minutes since show start, engagement)` pairs for the curve chart.
pub fn curve_points(curve: &[EngagementPoint]) -> Vec<(f64, f64)> {
    let Some(first) = curve.first() else {
        return Vec::new();
    };
    curve
        .iter()
        .map(|p| {
            (
                (p.time - first.time).num_minutes() as f64,
                f64::from(p.engagement),
            )
        })
        .collect()
}

/// One list row per track: rank, trend arrow, artist, title, plays.
pub fn track_items(tracks: &[TrackEntry]) -> Vec<ListItem<'static>> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{} ", i + 1), Style::default().fg(GOLD)),
                Span::styled(
                    format!("{} ", t.trend.arrow()),
                    Style::default().fg(theme::trend_color(t.trend)),
                ),
                Span::styled(
                    t.artist.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" - {} ", t.title)),
                Span::styled(
                    format!("{} diffusions", t.plays),
                    Style::default().fg(MUTED),
                ),
            ]))
        })
        .collect()
}

pub fn render_programme(f: &mut Frame, area: Rect, snap: Option<&DashboardSnapshot>) {
    let Some(snap) = snap else {
        f.render_widget(
            Paragraph::new("En attente du premier cycle...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED))
                .block(theme::card("PROGRAMME EN COURS")),
            area,
        );
        return;
    };

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let [show, curve] = Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(left);
    let [top, social] = Layout::vertical([Constraint::Min(0), Constraint::Length(6)]).areas(right);

    render_show(f, show, snap);
    render_curve(f, curve, &snap.engagement_curve);
    f.render_widget(
        List::new(track_items(snap.tracks)).block(theme::card("TOP 8 EN COURS")),
        top,
    );
    render_social(f, social, snap.social);
}

fn render_show(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let program = &snap.program;
    let lines = vec![
        Line::from(Span::styled(
            program.name,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Animateur: {}", program.host)),
        Line::from(Span::styled(
            format!("{} - {}", program.start_time, program.end_time),
            Style::default().fg(MUTED),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} auditeurs", format_count(u64::from(program.listeners))),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" | Engagement: {}%", program.engagement)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(theme::card(&format!(
            "PROGRAMME EN COURS - {}",
            snap.station.short_name
        ))),
        area,
    );
}

fn render_curve(f: &mut Frame, area: Rect, curve: &[EngagementPoint]) {
    let points = curve_points(curve);
    let span = points.last().map_or(1.0, |&(x, _)| x.max(1.0));
    let labels: Vec<String> = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => vec![
            first.time.format("%H:%M").to_string(),
            last.time.format("%H:%M").to_string(),
        ],
        _ => Vec::new(),
    };

    let chart = Chart::new(vec![Dataset::default()
        .name("Engagement")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(SKY))
        .data(&points)])
    .block(theme::card("Engagement pendant l'émission"))
    .x_axis(
        Axis::default()
            .style(Style::default().fg(MUTED))
            .bounds([0.0, span])
            .labels(labels),
    )
    .y_axis(
        Axis::default()
            .style(Style::default().fg(MUTED))
            .bounds(CURVE_BOUNDS)
            .labels(["60", "80", "100"]),
    );
    f.render_widget(chart, area);
}

fn render_social(f: &mut Frame, area: Rect, social: SocialActivity) {
    let lines: Vec<Line> = social
        .entries()
        .into_iter()
        .map(|(platform, count)| {
            Line::from(vec![
                Span::raw(format!("{:<12}", platform)),
                Span::styled(
                    format_count(u64::from(count)),
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(theme::card("ACTIVITÉ SOCIALE")),
        area,
    );
}
