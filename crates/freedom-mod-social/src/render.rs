use chrono::NaiveDateTime;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use freedom_metrics::format::format_age;
use freedom_metrics::social::{SocialFeed, SocialMessage};
use freedom_ui::theme::{self, ACCENT, GOLD, MUTED};

const TITLE: &str = "FLUX SOCIAL LIVE RÉUNION";

/// Three rows per message: author and age, text, like count.
pub fn message_item(message: &SocialMessage, now: NaiveDateTime) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                message.author.clone(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {}", format_age(message.posted_at, now)),
                Style::default().fg(MUTED),
            ),
        ]),
        Line::from(format!("  {}", message.text)),
        Line::from(Span::styled(
            format!("  ❤ {}", message.likes),
            Style::default().fg(ACCENT),
        )),
    ])
}

pub fn render_social(
    f: &mut Frame,
    area: Rect,
    feed: Option<&SocialFeed>,
    now: Option<NaiveDateTime>,
    selection: &mut ListState,
) {
    let (Some(feed), Some(now)) = (feed, now) else {
        f.render_widget(
            Paragraph::new("En attente du premier cycle...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED))
                .block(theme::card(TITLE)),
            area,
        );
        return;
    };

    let items: Vec<ListItem> = feed.visible().map(|m| message_item(m, now)).collect();
    let list = List::new(items)
        .block(theme::card(TITLE))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▌");
    f.render_stateful_widget(list, area, selection);
}
