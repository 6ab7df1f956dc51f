use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use freedom_metrics::station::{HOME_TOWN, SLOGAN};

use crate::layout::DashboardRects;
use crate::theme::{ACCENT, FLAG, GOLD, MUTED};

/// Header width from which the home town fits beside the slogan.
const WIDE_HEADER: u16 = 140;

/// Everything the shell chrome shows around the active panel.
pub struct ShellView<'a> {
    pub station_name: &'a str,
    pub frequency: &'a str,
    /// Panel titles in registry order.
    pub tabs: Vec<&'a str>,
    pub active_tab: usize,
    /// Wall clock, already formatted.
    pub clock: &'a str,
    /// False until the first cycle has produced data.
    pub on_air: bool,
    pub status_line: &'a str,
    pub next_refresh_secs: u64,
    pub refresh_secs: u64,
    pub hud_left: Vec<String>,
    pub hud_right: Vec<String>,
    pub dove_lines: Vec<String>,
}

pub fn render_shell(
    f: &mut Frame,
    rects: DashboardRects,
    view: ShellView<'_>,
    hero: impl FnOnce(&mut Frame, Rect),
) {
    render_header(f, rects.header, &view);
    hero(f, rects.hero);
    render_hud(f, rects, &view);
    render_status(f, rects.status, &view);
}

fn render_header(f: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let [title_row, tabs_row] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

    let mut spans: Vec<Span> = FLAG
        .iter()
        .map(|&c| Span::styled("▌", Style::default().fg(c)))
        .collect();
    spans.push(Span::styled(
        format!(" {} ", view.station_name),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(view.frequency.to_string(), Style::default().fg(GOLD)));
    spans.push(Span::styled(format!("  {}", SLOGAN), Style::default().fg(MUTED)));
    if title_row.width >= WIDE_HEADER {
        spans.push(Span::styled(format!(" · {}", HOME_TOWN), Style::default().fg(MUTED)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), title_row);

    let live = if view.on_air {
        Span::styled(" ● EN DIRECT ", Style::default().fg(Color::White).bg(ACCENT).bold())
    } else {
        Span::styled(" ○ HORS LIGNE ", Style::default().fg(MUTED))
    };
    let right = Line::from(vec![live, Span::raw(format!(" {} ", view.clock))]);
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), title_row);

    let tabs = Tabs::new(view.tabs.iter().map(|t| Line::from(*t)))
        .select(view.active_tab)
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .divider("│");
    f.render_widget(tabs, tabs_row);
}

fn render_hud(f: &mut Frame, rects: DashboardRects, view: &ShellView<'_>) {
    if rects.hud.height == 0 {
        return;
    }
    let column = |lines: &[String], title: &'static str| {
        Paragraph::new(Text::from(
            lines.iter().cloned().map(Line::from).collect::<Vec<_>>(),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(title),
        )
    };
    f.render_widget(column(&view.hud_left, "COMMANDES"), rects.hud_left);
    f.render_widget(
        column(&view.dove_lines, "FREEDOM").alignment(Alignment::Center),
        rects.hud_face,
    );
    f.render_widget(column(&view.hud_right, "EN BREF"), rects.hud_right);
}

fn render_status(f: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let countdown = format!(
        " prochain cycle {}s / {}s ",
        view.next_refresh_secs, view.refresh_secs
    );
    let [left, right] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(countdown.chars().count() as u16),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Line::from(format!(" {}", view.status_line)))
            .style(Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 40))),
        left,
    );
    f.render_widget(
        Paragraph::new(Line::from(countdown)).style(Style::default().fg(Color::Black).bg(GOLD)),
        right,
    );
}
