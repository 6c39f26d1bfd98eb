//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = centered_popup(area, 64, area.height.saturating_sub(4));

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        frame.render_widget(Clear, dialog_area);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Key reference, one entry per section
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Everywhere",
        &[
            ("Tab", "Focus next pane"),
            ("Shift+Tab", "Focus previous pane"),
            ("Ctrl+c", "Quit"),
            ("F1", "Show this help"),
        ],
    ),
    (
        "Prompt",
        &[
            ("Enter", "Generate an image"),
            ("Ctrl+u", "Clear the prompt"),
            ("Esc", "Leave the prompt"),
        ],
    ),
    (
        "Other panes",
        &[
            ("i / /", "Back to the prompt"),
            ("t", "Toggle theme"),
            ("n", "Subscribe to the newsletter"),
            ("?", "Show this help"),
            ("q", "Quit"),
        ],
    ),
    (
        "Result",
        &[
            ("d", "Download image"),
            ("s", "Share image URL"),
            ("a", "Save to gallery"),
            ("g", "Generate similar (copies the prompt)"),
        ],
    ),
    (
        "Gallery",
        &[
            ("j / ↓", "Next tile"),
            ("k / ↑", "Previous tile"),
            ("f / →", "Next filter"),
            ("F / ←", "Previous filter"),
            ("0-5", "Pick a filter"),
            ("d / s", "Download / share tile"),
            ("g / Enter", "Generate similar"),
            ("x / Del", "Delete tile"),
        ],
    ),
    (
        "History",
        &[
            ("l / →", "Next entry"),
            ("h / ←", "Previous entry"),
            ("d / s", "Download / share entry"),
            ("g / Enter", "Generate similar"),
        ],
    ),
];

fn build_help_content() -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", title), heading)));
        for (key, description) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:12}", key), key_style),
                Span::raw(*description),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  q, Esc or ? closes this dialog",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_scroll_keys_stay_in_dialog() {
        let mut dialog = HelpDialog::default();
        let down = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(dialog.handle_key_event(down).unwrap(), None);
        assert_eq!(dialog.scroll_offset, 1);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(dialog.handle_key_event(esc).unwrap(), Some(Action::CloseModal));
    }

    #[test]
    fn test_content_lists_item_actions() {
        let text: String = build_help_content()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Save to gallery"));
        assert!(text.contains("Delete tile"));
    }
}
