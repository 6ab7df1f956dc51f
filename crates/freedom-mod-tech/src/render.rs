//! Hero-pane rendering for the technical monitoring panel.
//!
//! Draws the four broadcast-chain indicators, the server-load gauge and
//! the recent load samples. Below eight rows only the indicators and the
//! gauge are drawn.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, LineGauge, Paragraph, Sparkline},
    Frame,
};

use freedom_metrics::format::format_signed;
use freedom_metrics::monitoring::{LoadBand, TechnicalStatus, LOAD_ALERT_THRESHOLD};
use freedom_ui::theme::{self, MUTED, SKY};

/// Clamp a percentage to a ratio safe for the gauge widgets.
fn ratio(pct: u8) -> f64 {
    (f64::from(pct) / 100.0).clamp(0.0, 1.0)
}

/// Gauge label: load, change since the previous sample, and the alert flag.
pub fn load_label(status: &TechnicalStatus) -> String {
    let load = status.load();
    let mut label = format!(
        "{}% ({})",
        load,
        format_signed(i64::from(status.load_delta()))
    );
    if load >= LOAD_ALERT_THRESHOLD {
        label.push_str(" ALERTE");
    }
    label
}

pub fn render_tech(f: &mut Frame, area: Rect, status: Option<&TechnicalStatus>) {
    let block = theme::card("MONITORING TECHNIQUE FREEDOM");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(status) = status else {
        f.render_widget(
            Paragraph::new("En attente du premier cycle...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED)),
            inner,
        );
        return;
    };

    let [indicators, load, history] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    render_indicators(f, indicators, status);
    render_load(f, load, status);
    if inner.height >= 8 {
        render_history(f, history, status);
    }
}

fn render_indicators(f: &mut Frame, area: Rect, status: &TechnicalStatus) {
    let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let quality = theme::card("QUALITÉ STREAM");
    let quality_inner = quality.inner(cols[0]);
    f.render_widget(quality, cols[0]);
    f.render_widget(
        LineGauge::default()
            .ratio(ratio(status.stream_quality))
            .label(format!("{}%", status.stream_quality))
            .filled_style(Style::default().fg(Color::Green))
            .unfilled_style(Style::default().fg(MUTED)),
        quality_inner,
    );

    let latency = Paragraph::new(vec![
        Line::from(Span::styled(format!("{}ms", status.latency_ms), bold)),
        Line::from(Span::styled(
            status.latency_status.label(),
            Style::default().fg(theme::latency_color(status.latency_status)),
        )),
    ])
    .block(theme::card("LATENCE MOYENNE"));
    f.render_widget(latency, cols[1]);

    let all_online = status.transmitters_online == status.transmitters_total;
    let transmitters = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{}/{}", status.transmitters_online, status.transmitters_total),
            bold,
        )),
        Line::from(Span::styled(
            if all_online { "Tous en ligne" } else { "Incident" },
            Style::default().fg(if all_online { Color::Green } else { Color::Red }),
        )),
    ])
    .block(theme::card("ÉMETTEURS ACTIFS"));
    f.render_widget(transmitters, cols[2]);

    let bandwidth = Paragraph::new(Line::from(Span::styled(
        format!("{} Mbps", status.bandwidth_mbps),
        bold,
    )))
    .block(theme::card("BANDE PASSANTE"));
    f.render_widget(bandwidth, cols[3]);
}

fn render_load(f: &mut Frame, area: Rect, status: &TechnicalStatus) {
    let load = status.load();
    let color = theme::load_color(LoadBand::for_load(load));
    let gauge = Gauge::default()
        .block(theme::card("CHARGE SERVEUR FREEDOM"))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio(load))
        .label(load_label(status));
    f.render_widget(gauge, area);
}

fn render_history(f: &mut Frame, area: Rect, status: &TechnicalStatus) {
    let samples: Vec<u64> = status.server_load.iter().map(|&l| u64::from(l)).collect();
    let sparkline = Sparkline::default()
        .block(theme::card("Charge récente"))
        .data(samples)
        .max(100)
        .style(Style::default().fg(SKY));
    f.render_widget(sparkline, area);
}
