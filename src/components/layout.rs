//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub prompt: Rect,
    pub result: Rect,
    pub filters: Rect,
    pub gallery: Rect,
    pub history: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
///
/// Prompt on top, result and gallery side by side, history strip below,
/// then a status line and the help bar.
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // Result (60%) and gallery (40%)
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    let gallery_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(horizontal_chunks[1]);

    MainLayout {
        prompt: main_chunks[0],
        result: horizontal_chunks[0],
        filters: gallery_chunks[0],
        gallery: gallery_chunks[1],
        history: main_chunks[2],
        status: main_chunks[3],
        help: main_chunks[4],
    }
}
