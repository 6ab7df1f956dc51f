//! Colours and small styled pieces shared by the shell and the panels.

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use freedom_metrics::format::format_signed;
use freedom_metrics::monitoring::{LatencyStatus, LoadBand};
use freedom_metrics::Trend;

pub const ACCENT: Color = Color::Rgb(220, 30, 50);
pub const GOLD: Color = Color::Rgb(250, 200, 40);
pub const SKY: Color = Color::Rgb(40, 110, 200);
pub const MUTED: Color = Color::DarkGray;

/// Stripes of the Réunion flag, left to right, used by the header band.
pub const FLAG: [Color; 3] = [SKY, GOLD, ACCENT];

pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Stable => Color::Yellow,
    }
}

pub fn load_color(band: LoadBand) -> Color {
    match band {
        LoadBand::Normal => Color::Green,
        LoadBand::Elevated => Color::Yellow,
        LoadBand::Critical => Color::Red,
    }
}

pub fn latency_color(status: LatencyStatus) -> Color {
    match status {
        LatencyStatus::Good => Color::Green,
        LatencyStatus::Average => Color::Yellow,
        LatencyStatus::High => Color::Red,
    }
}

/// Rounded, titled card used by every panel.
pub fn card(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(MUTED))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ))
}

/// Green/red badge for a change value; `None` renders nothing.
pub fn delta_badge(delta: Option<i32>, suffix: &str) -> Option<Span<'static>> {
    let d = delta?;
    let color = if d >= 0 { Color::Green } else { Color::Red };
    Some(Span::styled(
        format!(" {}{}", format_signed(i64::from(d)), suffix),
        Style::default().fg(color),
    ))
}
