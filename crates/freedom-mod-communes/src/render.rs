use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, LineGauge, Paragraph},
    Frame,
};

use freedom_metrics::format::{format_count, format_percent};
use freedom_metrics::geo::{GeoDistribution, Locality};
use freedom_metrics::station::DeviceShare;
use freedom_metrics::DashboardSnapshot;
use freedom_ui::theme::{self, ACCENT, MUTED, SKY};

const TOP_COUNT: usize = 5;

/// Light-to-deep red by share of the largest commune.
fn heat(listeners: u32, max: u32) -> Color {
    let ratio = if max == 0 {
        0.0
    } else {
        f64::from(listeners) / f64::from(max)
    };
    let fade = (200.0 - 170.0 * ratio.clamp(0.0, 1.0)) as u8;
    Color::Rgb(255, fade, fade)
}

/// Bars from the largest commune down, one per row.
///
/// [`GeoDistribution::ascending`] is plotted bottom-up, so the largest
/// commune ends up on the first row.
pub fn commune_bars(geo: &GeoDistribution) -> Vec<Bar<'static>> {
    let ordered: Vec<&Locality> = geo.ascending().into_iter().rev().collect();
    let max = ordered.first().map_or(0, |l| l.listeners);
    ordered
        .into_iter()
        .map(|l| {
            Bar::default()
                .label(Line::from(l.name))
                .value(u64::from(l.listeners))
                .text_value(format_count(u64::from(l.listeners)))
                .style(Style::default().fg(heat(l.listeners, max)))
                .value_style(Style::default().fg(Color::Black).bg(heat(l.listeners, max)))
        })
        .collect()
}

pub fn render_communes(f: &mut Frame, area: Rect, snap: Option<&DashboardSnapshot>) {
    let Some(snap) = snap else {
        f.render_widget(
            Paragraph::new("En attente du premier cycle...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED))
                .block(theme::card("AUDIENCE COMMUNES")),
            area,
        );
        return;
    };

    let [chart, side] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area);

    let bars = BarChart::default()
        .block(theme::card(&format!(
            "Audience par commune - {}",
            snap.station.short_name
        )))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&commune_bars(&snap.geo)));
    f.render_widget(bars, chart);

    let [top, devices] =
        Layout::vertical([Constraint::Length(TOP_COUNT as u16 + 2), Constraint::Min(0)]).areas(side);
    render_top(f, top, &snap.geo);
    render_devices(f, devices, snap.live.devices);
}

fn render_top(f: &mut Frame, area: Rect, geo: &GeoDistribution) {
    let lines: Vec<Line> = geo
        .top(TOP_COUNT)
        .into_iter()
        .enumerate()
        .map(|(i, l)| {
            Line::from(vec![
                Span::styled(format!("#{} ", i + 1), Style::default().fg(theme::GOLD)),
                Span::styled(
                    format!("{:<14}", l.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>7} ", format_count(u64::from(l.listeners)))),
                Span::styled(
                    format_percent(geo.share_percent(l.listeners)),
                    Style::default().fg(MUTED),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(theme::card("Top 5 communes")), area);
}

fn render_devices(f: &mut Frame, area: Rect, devices: DeviceShare) {
    let block = theme::card("Support d'écoute");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 3]).split(inner);
    let shares = [
        ("Mobile", devices.mobile, ACCENT),
        ("Voiture", devices.car, SKY),
        ("Domicile", devices.home, Color::Gray),
    ];
    for ((label, pct, color), row) in shares.into_iter().zip(rows.iter()) {
        let gauge = LineGauge::default()
            .ratio((f64::from(pct) / 100.0).clamp(0.0, 1.0))
            .label(format!("{:<9}{:>3}%", label, pct))
            .filled_style(Style::default().fg(color))
            .unfilled_style(Style::default().fg(MUTED));
        f.render_widget(gauge, *row);
    }
}
