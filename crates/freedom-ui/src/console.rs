use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use freedom_core::console::Console;
use freedom_core::logging::LogLevel;

use crate::theme::GOLD;

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Error => Color::Red,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Info => Color::Green,
        LogLevel::Debug => Color::Cyan,
        LogLevel::Trace => Color::DarkGray,
    }
}

/// Draw the console over the top half of `area`: title bar, scrollback
/// and prompt. Does nothing while the console is hidden.
pub fn render_console(f: &mut Frame, area: Rect, console: &Console, footer: &str) {
    if !console.visible {
        return;
    }
    let height = (area.height / 2).max(3).min(area.height);
    let overlay = Rect { height, ..area };
    f.render_widget(Clear, overlay);

    let [title_row, log_area, input_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(overlay);

    let title = Line::from(vec![
        Span::styled(
            " CONSOLE ",
            Style::default()
                .fg(Color::Black)
                .bg(GOLD)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}  ", footer)),
        Span::styled("~ fermer  PgUp/PgDn défiler", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(
        Paragraph::new(title).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        title_row,
    );

    let visible = log_area.height as usize;
    let total = console.lines().len();
    let end = total.saturating_sub(console.scroll_offset());
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = console
        .lines()
        .range(start..end)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!(" {:5} ", entry.level),
                    Style::default()
                        .fg(level_color(entry.level))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("[{}] ", entry.target),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(entry.message.as_str()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::LEFT | Borders::RIGHT)
                    .style(Style::default().bg(Color::Black)),
            )
            .wrap(Wrap { trim: false }),
        log_area,
    );

    let prompt = Line::from(vec![
        Span::styled("> ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::raw(console.input.text()),
    ]);
    f.render_widget(
        Paragraph::new(prompt).style(Style::default().bg(Color::Black).fg(Color::White)),
        input_row,
    );

    let col = console.input.text()[..console.input.cursor()].width() as u16;
    f.set_cursor_position((input_row.x + 2 + col, input_row.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn draw(console: &Console, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render_console(f, f.area(), console, "station 1 · 30s"))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn hidden_console_draws_nothing() {
        let buf = draw(&Console::default(), 60, 20);
        assert!(row(&buf, 0).trim().is_empty());
    }

    #[test]
    fn shows_latest_lines_and_prompt() {
        let mut c = Console::default();
        c.visible = true;
        for i in 0..20 {
            c.print(&format!("cycle {i}"));
        }
        for ch in "rate 20".chars() {
            c.input.insert(ch);
        }
        // 20 rows: overlay of 10, so 8 log rows.
        let buf = draw(&c, 60, 20);
        assert!(row(&buf, 0).contains("CONSOLE"));
        assert!(row(&buf, 0).contains("station 1"));
        assert!(row(&buf, 1).contains("cycle 12"));
        assert!(row(&buf, 8).contains("cycle 19"));
        assert!(row(&buf, 9).starts_with("> rate 20"));
    }

    #[test]
    fn scrolled_view_hides_newest() {
        let mut c = Console::default();
        c.visible = true;
        for i in 0..20 {
            c.print(&format!("cycle {i}"));
        }
        c.scroll_up(5);
        let buf = draw(&c, 60, 20);
        assert!(row(&buf, 8).contains("cycle 14"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let mut c = Console::default();
        c.visible = true;
        c.print("hello");
        let _ = draw(&c, 10, 3);
    }
}
