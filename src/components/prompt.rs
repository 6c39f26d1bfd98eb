//! Prompt input component
//!
//! Single-line text input. Enter submits; the text stays in place afterwards
//! so it can be tweaked and submitted again.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Default)]
pub struct PromptComponent {
    pub input: String,
    pub focused: bool,
    /// Time spent waiting on the backend, while a generation is in flight
    pub loading: Option<Duration>,
    spinner_frame: usize,
}

impl PromptComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input text (used by "generate similar")
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }
}

/// The end of `text` that fits in `width` columns
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

impl Component for PromptComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => Some(Action::SubmitPrompt),
            KeyCode::Backspace => Some(Action::PromptBackspace),
            KeyCode::Esc => Some(Action::FocusNext),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PromptClear)
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Action::PromptInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::PromptInput(c) => self.input.push(c),
            Action::PromptBackspace => {
                self.input.pop();
            }
            Action::PromptClear => self.input.clear(),
            Action::PromptPaste(text) => {
                // Single-line input: line breaks become spaces
                let text: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.input.push_str(&text);
            }
            Action::Tick => {
                if self.loading.is_some() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border_color = if self.focused { Color::Cyan } else { Color::DarkGray };

        let title = match self.loading {
            Some(elapsed) => format!(
                " Prompt {} generating {}s ",
                self.spinner(),
                elapsed.as_secs()
            ),
            None => " Prompt ".to_string(),
        };

        // Borders, the "❯ " prefix and the cursor
        let width = area.width.saturating_sub(5) as usize;

        let mut spans = vec![Span::styled(
            "❯ ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )];
        if self.input.is_empty() && !self.focused {
            spans.push(Span::styled(
                "Describe the image you want...",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(
                visible_tail(&self.input, width).to_string(),
                Style::default().fg(Color::White),
            ));
        }
        if self.focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title)
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keys_map_to_actions() {
        let mut prompt = PromptComponent::new();
        assert_eq!(
            prompt.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::PromptInput('q'))
        );
        assert_eq!(
            prompt.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::SubmitPrompt)
        );
        assert_eq!(
            prompt
                .handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
                .unwrap(),
            Some(Action::PromptClear)
        );
    }

    #[test]
    fn test_editing() {
        let mut prompt = PromptComponent::new();
        for c in "fox".chars() {
            prompt.update(Action::PromptInput(c)).unwrap();
        }
        prompt.update(Action::PromptBackspace).unwrap();
        assert_eq!(prompt.input, "fo");

        prompt
            .update(Action::PromptPaste("x in\nthe snow".into()))
            .unwrap();
        assert_eq!(prompt.input, "fox in the snow");

        prompt.update(Action::PromptClear).unwrap();
        assert!(prompt.input.is_empty());
    }

    #[test]
    fn test_spinner_only_advances_while_loading() {
        let mut prompt = PromptComponent::new();
        let first = prompt.spinner();
        prompt.update(Action::Tick).unwrap();
        assert_eq!(prompt.spinner(), first);

        prompt.loading = Some(Duration::from_secs(1));
        prompt.update(Action::Tick).unwrap();
        assert_ne!(prompt.spinner(), first);
    }

    #[test]
    fn test_visible_tail() {
        assert_eq!(visible_tail("a red fox", 20), "a red fox");
        assert_eq!(visible_tail("a red fox", 3), "fox");
        // Wide characters take two columns
        assert_eq!(visible_tail("猫猫猫", 4), "猫猫");
        assert_eq!(visible_tail("abc", 0), "");
    }
}
