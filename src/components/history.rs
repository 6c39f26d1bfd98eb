//! History strip component
//!
//! Recent generations in a row of cells, newest on the left.

use crate::action::{Action, ItemRef};
use crate::component::Component;
use crate::model::{HistoryItem, HistoryStrip};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

#[derive(Default)]
pub struct HistoryComponent {
    pub focused: bool,
    entries: Vec<HistoryItem>,
    capacity: usize,
    selected: usize,
}

impl HistoryComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the strip for rendering. A new entry moves the selection back
    /// to the newest cell.
    pub fn sync(&mut self, history: &HistoryStrip) {
        let grew = history.len() > self.entries.len()
            || history.get(0) != self.entries.first();
        self.entries = history.iter().cloned().collect();
        self.capacity = history.capacity();
        if grew {
            self.selected = 0;
        }
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn selected(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.entries.is_empty() {
            let len = self.entries.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }
}

/// Cut `text` to `width` columns, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl Component for HistoryComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let selected = self.selected();
        let action = match key.code {
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextItem),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevItem),
            KeyCode::Char('d') => selected.map(|i| Action::Download(ItemRef::History(i))),
            KeyCode::Char('s') => selected.map(|i| Action::Share(ItemRef::History(i))),
            KeyCode::Char('g') | KeyCode::Enter => {
                selected.map(|i| Action::GenerateSimilar(ItemRef::History(i)))
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.next(),
            Action::PrevItem => self.previous(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border_color = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" History ({}/{}) ", self.entries.len(), self.capacity))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.entries.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Recent generations will show up here",
                    Style::default().fg(Color::DarkGray),
                )),
                inner,
            );
            return Ok(());
        }

        let slots = self.capacity.max(1);
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, slots as u32); slots])
            .split(inner);

        for (index, (entry, cell)) in self.entries.iter().zip(cells.iter()).enumerate() {
            let is_selected = self.focused && index == self.selected;
            let style = if is_selected {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let width = cell.width.saturating_sub(1) as usize;
            let lines = vec![
                Line::from(Span::styled(truncate(&entry.prompt, width), style)),
                Line::from(Span::styled(
                    truncate(&entry.image_url, width),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(Paragraph::new(lines), *cell);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_new_entry_resets_selection() {
        let mut history = HistoryStrip::new();
        history.push("/1.png", "one");
        history.push("/2.png", "two");

        let mut view = HistoryComponent::new();
        view.sync(&history);
        view.next();
        assert_eq!(view.selected(), Some(1));

        history.push("/3.png", "three");
        view.sync(&history);
        assert_eq!(view.selected(), Some(0));
    }

    #[test]
    fn test_selection_clamps_at_capacity() {
        let mut history = HistoryStrip::new();
        for i in 0..6 {
            history.push(format!("/{}.png", i), format!("p{}", i));
        }
        let mut view = HistoryComponent::new();
        view.sync(&history);
        view.previous();
        assert_eq!(view.selected(), Some(5));

        // Eviction keeps six entries; the newest is selected again
        history.push("/6.png", "p6");
        view.sync(&history);
        assert_eq!(view.selected(), Some(0));
    }

    #[test]
    fn test_keys() {
        let mut view = HistoryComponent::new();
        let g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(view.handle_key_event(g).unwrap(), None);

        let mut history = HistoryStrip::new();
        history.push("/1.png", "one");
        view.sync(&history);
        assert_eq!(
            view.handle_key_event(g).unwrap(),
            Some(Action::GenerateSimilar(ItemRef::History(0)))
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long prompt", 6), "a lon…");
    }
}
