//! Toast overlay
//!
//! Toasts stack up from the bottom-right corner, oldest on top. A fading
//! toast is drawn dimmed for its last moments on screen.

use crate::model::{Severity, Toast, ToastStack};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const TOAST_MAX_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

fn severity_style(severity: Severity) -> (Color, &'static str) {
    match severity {
        Severity::Info => (Color::Cyan, "ℹ"),
        Severity::Success => (Color::Green, "✓"),
        Severity::Error => (Color::Red, "✗"),
    }
}

/// Areas for `count` toasts above the bottom-right corner of `area`.
/// When they do not all fit, the newest ones win.
pub fn toast_areas(area: Rect, widths: &[u16]) -> Vec<Option<Rect>> {
    let fits = (area.height / TOAST_HEIGHT) as usize;
    let skip = widths.len().saturating_sub(fits);

    let mut bottom = area.y + area.height;
    let mut areas = vec![None; widths.len()];
    for (index, width) in widths.iter().enumerate().skip(skip).rev() {
        let width = (*width).min(area.width);
        bottom -= TOAST_HEIGHT;
        areas[index] = Some(Rect::new(
            area.x + area.width - width,
            bottom,
            width,
            TOAST_HEIGHT,
        ));
    }
    areas
}

fn toast_width(toast: &Toast) -> u16 {
    // Borders, icon and padding
    let text = toast.message.width() as u16 + 6;
    text.min(TOAST_MAX_WIDTH)
}

/// Draw every live toast over `area`
pub fn draw_toasts(frame: &mut Frame, area: Rect, toasts: &ToastStack, now: Instant) {
    let toasts: Vec<&Toast> = toasts.iter().collect();
    let widths: Vec<u16> = toasts.iter().map(|t| toast_width(t)).collect();

    for (toast, rect) in toasts.iter().zip(toast_areas(area, &widths)) {
        let Some(rect) = rect else { continue };
        let (color, icon) = severity_style(toast.severity);
        let (color, text_color) = if toast.is_fading(now) {
            (Color::DarkGray, Color::DarkGray)
        } else {
            (color, Color::White)
        };

        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", icon),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(toast.message.clone(), Style::default().fg(text_color)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_stack_from_bottom_right() {
        let area = Rect::new(0, 0, 80, 24);
        let areas = toast_areas(area, &[20, 30]);
        assert_eq!(areas[1], Some(Rect::new(50, 21, 30, 3)));
        assert_eq!(areas[0], Some(Rect::new(60, 18, 20, 3)));
    }

    #[test]
    fn test_oldest_toasts_are_hidden_when_space_runs_out() {
        let area = Rect::new(0, 0, 80, 7);
        let areas = toast_areas(area, &[10, 10, 10]);
        assert_eq!(areas[0], None);
        assert!(areas[1].is_some());
        assert!(areas[2].is_some());
    }

    #[test]
    fn test_width_is_capped() {
        let mut stack = ToastStack::new();
        stack.info("x".repeat(200));
        stack.info("short");
        let widths: Vec<u16> = stack.iter().map(toast_width).collect();
        assert_eq!(widths, vec![TOAST_MAX_WIDTH, 11]);
    }
}
