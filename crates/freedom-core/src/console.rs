use std::collections::VecDeque;

use crate::logging::{LogEntry, LogLevel};

/// Lines kept in the console scrollback.
pub const CONSOLE_CAPACITY: usize = 1000;

const RECALL_CAPACITY: usize = 50;

/// Single-line editor for the console prompt. The cursor is a byte index
/// that always sits on a char boundary.
#[derive(Debug, Default, Clone)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn replace(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Drop-down console: scrollback of log and command output, plus a prompt
/// with recall of previously submitted commands.
pub struct Console {
    pub visible: bool,
    pub input: InputLine,
    lines: VecDeque<LogEntry>,
    capacity: usize,
    scroll: usize,
    recall: VecDeque<String>,
    recall_pos: Option<usize>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(CONSOLE_CAPACITY)
    }
}

impl Console {
    pub fn new(capacity: usize) -> Self {
        Self {
            visible: false,
            input: InputLine::default(),
            lines: VecDeque::with_capacity(capacity),
            capacity,
            scroll: 0,
            recall: VecDeque::new(),
            recall_pos: None,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
            self.scroll = self.scroll.saturating_sub(1);
        }
        self.lines.push_back(entry);
    }

    /// Append command output. Multi-line text becomes one entry per line.
    pub fn print(&mut self, text: &str) {
        for line in text.lines() {
            self.push_log(LogEntry {
                level: LogLevel::Info,
                target: "console".into(),
                message: line.to_string(),
            });
        }
    }

    pub fn lines(&self) -> &VecDeque<LogEntry> {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll = 0;
    }

    /// Lines scrolled up from the bottom.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn scroll_up(&mut self, amount: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll = (self.scroll + amount).min(max);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    /// Take the prompt text, remembering non-empty commands for recall.
    pub fn submit(&mut self) -> String {
        let line = self.input.take();
        self.recall_pos = None;
        let trimmed = line.trim();
        if !trimmed.is_empty() && self.recall.back().map(String::as_str) != Some(trimmed) {
            if self.recall.len() >= RECALL_CAPACITY {
                self.recall.pop_front();
            }
            self.recall.push_back(trimmed.to_string());
        }
        line
    }

    /// Step back through submitted commands.
    pub fn recall_prev(&mut self) {
        if self.recall.is_empty() {
            return;
        }
        let pos = match self.recall_pos {
            None => self.recall.len() - 1,
            Some(p) => p.saturating_sub(1),
        };
        self.recall_pos = Some(pos);
        self.input.replace(&self.recall[pos]);
    }

    /// Step forward; past the newest entry the prompt is cleared.
    pub fn recall_next(&mut self) {
        let Some(pos) = self.recall_pos else {
            return;
        };
        if pos + 1 < self.recall.len() {
            self.recall_pos = Some(pos + 1);
            self.input.replace(&self.recall[pos + 1]);
        } else {
            self.recall_pos = None;
            self.input.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(msg: &str) -> LogEntry {
        LogEntry {
            level: LogLevel::Info,
            target: "test".into(),
            message: msg.into(),
        }
    }

    fn type_str(c: &mut Console, s: &str) {
        for ch in s.chars() {
            c.input.insert(ch);
        }
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut c = Console::default();
        assert!(!c.visible);
        c.toggle();
        assert!(c.visible);
    }

    #[test]
    fn scrollback_is_bounded() {
        let mut c = Console::new(3);
        for i in 0..5 {
            c.push_log(entry(&format!("cycle {}", i)));
        }
        assert_eq!(c.lines().len(), 3);
        assert_eq!(c.lines()[0].message, "cycle 2");
        assert_eq!(c.lines()[2].message, "cycle 4");
    }

    #[test]
    fn print_splits_lines() {
        let mut c = Console::default();
        c.print("station 1\nrefresh 30s");
        assert_eq!(c.lines().len(), 2);
        assert_eq!(c.lines()[1].message, "refresh 30s");
        assert_eq!(c.lines()[1].target, "console");
    }

    #[test]
    fn scroll_clamps() {
        let mut c = Console::new(100);
        for i in 0..10 {
            c.push_log(entry(&format!("{}", i)));
        }
        c.scroll_up(4);
        assert_eq!(c.scroll_offset(), 4);
        c.scroll_up(50);
        assert_eq!(c.scroll_offset(), 9);
        c.scroll_down(50);
        assert_eq!(c.scroll_offset(), 0);
    }

    #[test]
    fn clear_resets_scroll() {
        let mut c = Console::new(100);
        c.print("a\nb\nc");
        c.scroll_up(2);
        c.clear();
        assert!(c.lines().is_empty());
        assert_eq!(c.scroll_offset(), 0);
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut c = Console::default();
        type_str(&mut c, "réu");
        assert_eq!(c.input.cursor(), 4);
        c.input.left();
        c.input.left();
        assert_eq!(c.input.cursor(), 1);
        c.input.right();
        assert_eq!(c.input.cursor(), 3);
        c.input.backspace();
        assert_eq!(c.input.text(), "ru");
        c.input.home();
        c.input.insert('>');
        assert_eq!(c.input.text(), ">ru");
        c.input.end();
        c.input.right();
        assert_eq!(c.input.cursor(), 3);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut c = Console::default();
        c.input.backspace();
        assert!(c.input.is_empty());
    }

    #[test]
    fn submit_returns_and_clears() {
        let mut c = Console::default();
        type_str(&mut c, "rate 20");
        assert_eq!(c.submit(), "rate 20");
        assert!(c.input.is_empty());
        assert_eq!(c.input.cursor(), 0);
    }

    #[test]
    fn recall_walks_history() {
        let mut c = Console::default();
        type_str(&mut c, "station 2");
        c.submit();
        type_str(&mut c, "refresh");
        c.submit();
        c.submit();

        c.recall_prev();
        assert_eq!(c.input.text(), "refresh");
        c.recall_prev();
        assert_eq!(c.input.text(), "station 2");
        c.recall_prev();
        assert_eq!(c.input.text(), "station 2");
        c.recall_next();
        assert_eq!(c.input.text(), "refresh");
        c.recall_next();
        assert!(c.input.is_empty());
    }

    #[test]
    fn repeated_command_recorded_once() {
        let mut c = Console::default();
        for _ in 0..3 {
            type_str(&mut c, "status");
            c.submit();
        }
        c.recall_prev();
        c.recall_prev();
        assert_eq!(c.input.text(), "status");
        c.recall_next();
        assert!(c.input.is_empty());
    }
}
