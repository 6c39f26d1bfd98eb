//! Result pane component
//!
//! Shows the loading indicator, or the last generated image with its actions.
//! A validation or request error is drawn above the image.

use crate::action::{Action, ItemRef};
use crate::component::Component;
use crate::model::GenerationResult;
use crate::services::PreviewImage;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Terminal preview of the current result
#[derive(Debug, Default)]
pub enum PreviewState {
    #[default]
    None,
    Loading,
    Ready(PreviewImage),
    Failed(String),
}

#[derive(Default)]
pub struct ResultComponent {
    pub focused: bool,
    result: Option<GenerationResult>,
    error: Option<String>,
    loading: bool,
    /// Locator the preview belongs to
    preview_url: Option<String>,
    pub preview: PreviewState,
}

impl ResultComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh what the pane shows from the generation flow
    pub fn set_state(&mut self, result: Option<&GenerationResult>, error: Option<&str>, loading: bool) {
        if result.map(|r| &r.image_url) != self.result.as_ref().map(|r| &r.image_url) {
            self.preview_url = None;
            self.preview = PreviewState::None;
        }
        self.result = result.cloned();
        self.error = error.map(str::to_string);
        self.loading = loading;
    }

    /// A preview for `image_url` has been requested
    pub fn expect_preview(&mut self, image_url: &str) {
        self.preview_url = Some(image_url.to_string());
        self.preview = PreviewState::Loading;
    }

    /// Apply a finished preview. Previews for images no longer shown are
    /// dropped; returns whether it was applied.
    pub fn apply_preview(&mut self, image_url: &str, outcome: Result<PreviewImage, String>) -> bool {
        if self.preview_url.as_deref() != Some(image_url) {
            return false;
        }
        self.preview = match outcome {
            Ok(image) => PreviewState::Ready(image),
            Err(e) => PreviewState::Failed(e),
        };
        true
    }

    fn placeholder_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "No image yet",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Type a prompt and press Enter to generate one",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }

    fn draw_result(&self, frame: &mut Frame, inner: Rect, result: &GenerationResult) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(inner);

        let preview_lines = match &self.preview {
            PreviewState::Ready(image) => image.lines(chunks[0].width, chunks[0].height),
            PreviewState::Loading => vec![Line::from(Span::styled(
                "Loading preview...",
                Style::default().fg(Color::DarkGray),
            ))],
            PreviewState::Failed(e) => vec![Line::from(Span::styled(
                format!("Preview unavailable: {}", e),
                Style::default().fg(Color::DarkGray),
            ))],
            PreviewState::None => Vec::new(),
        };
        frame.render_widget(
            Paragraph::new(preview_lines).alignment(Alignment::Center),
            chunks[0],
        );

        let info = vec![
            Line::from(vec![
                Span::styled("Prompt: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    result.prompt.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                result.image_url.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), chunks[1]);

        let hints = Line::from(vec![
            Span::styled(" d ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Download "),
            Span::styled(" s ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Share "),
            Span::styled(" a ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Save to gallery "),
            Span::styled(" g ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
            Span::raw("Similar"),
        ]);
        frame.render_widget(Paragraph::new(hints), chunks[2]);
    }
}

impl Component for ResultComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.result.is_none() {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Char('d') => Some(Action::Download(ItemRef::Result)),
            KeyCode::Char('s') => Some(Action::Share(ItemRef::Result)),
            KeyCode::Char('a') => Some(Action::SaveToGallery),
            KeyCode::Char('g') => Some(Action::GenerateSimilar(ItemRef::Result)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border_color = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Result ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading {
            let loading = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Generating image...",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
            return Ok(());
        }

        // The error sits above the last result; both stay visible
        let body = match &self.error {
            Some(error) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(2), Constraint::Min(1)])
                    .split(inner);
                let error = Paragraph::new(Line::from(Span::styled(
                    format!("✗ {}", error),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
                frame.render_widget(error, chunks[0]);
                chunks[1]
            }
            None => inner,
        };

        match &self.result {
            Some(result) => self.draw_result(frame, body, result),
            None if self.error.is_some() => {}
            None => frame.render_widget(
                Paragraph::new(self.placeholder_lines()).alignment(Alignment::Center),
                body,
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(pane: &mut ResultComponent) -> String {
        let mut terminal = Terminal::new(TestBackend::new(64, 16)).unwrap();
        terminal
            .draw(|frame| pane.draw(frame, frame.area()).unwrap())
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn result(url: &str) -> GenerationResult {
        GenerationResult {
            image_url: url.into(),
            prompt: "a red fox".into(),
        }
    }

    #[test]
    fn test_actions_need_a_result() {
        let mut pane = ResultComponent::new();
        let d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(pane.handle_key_event(d).unwrap(), None);

        pane.set_state(Some(&result("/a.png")), None, false);
        assert_eq!(
            pane.handle_key_event(d).unwrap(),
            Some(Action::Download(ItemRef::Result))
        );
    }

    #[test]
    fn test_stale_preview_is_dropped() {
        let mut pane = ResultComponent::new();
        pane.set_state(Some(&result("/a.png")), None, false);
        pane.expect_preview("/a.png");

        pane.set_state(Some(&result("/b.png")), None, false);
        assert!(matches!(pane.preview, PreviewState::None));
        assert!(!pane.apply_preview("/a.png", Err("late".into())));

        pane.expect_preview("/b.png");
        assert!(pane.apply_preview("/b.png", Err("404".into())));
        assert!(matches!(pane.preview, PreviewState::Failed(ref e) if e == "404"));
    }

    #[test]
    fn test_error_is_drawn_above_the_last_result() {
        let mut pane = ResultComponent::new();
        pane.set_state(
            Some(&result("/a.png")),
            Some("Please enter a prompt for the image generation"),
            false,
        );

        let screen = render(&mut pane);
        assert!(screen.contains("Please enter a prompt"));
        assert!(screen.contains("Prompt: a red fox"));
        assert!(screen.contains("Download"));

        let s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(
            pane.handle_key_event(s).unwrap(),
            Some(Action::Share(ItemRef::Result))
        );
    }

    #[test]
    fn test_error_without_result_hides_placeholder() {
        let mut pane = ResultComponent::new();
        pane.set_state(None, Some("GPU on fire"), false);

        let screen = render(&mut pane);
        assert!(screen.contains("GPU on fire"));
        assert!(!screen.contains("No image yet"));
    }
}
