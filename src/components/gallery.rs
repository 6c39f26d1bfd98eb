//! Gallery component
//!
//! Filter bar plus the list of tiles. The filter is view state: it decides
//! which tiles are listed and never changes the gallery itself.

use crate::action::{Action, ItemRef};
use crate::component::Component;
use crate::model::{Category, Gallery, GalleryFilter, TileId};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

/// Snapshot of a tile for rendering
#[derive(Debug, Clone)]
struct TileView {
    id: TileId,
    prompt: String,
    category: Category,
    created_at: String,
    removing: bool,
}

#[derive(Default)]
pub struct GalleryComponent {
    pub focused: bool,
    pub filter: GalleryFilter,
    tiles: Vec<TileView>,
    /// Tiles in the gallery regardless of the filter
    total: usize,
    list_state: ListState,
}

impl GalleryComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the visible tiles, keeping the selection on the same tile
    pub fn sync(&mut self, gallery: &Gallery) {
        let selected = self.selected_tile();

        self.total = gallery.len();
        self.tiles = gallery
            .visible(self.filter)
            .into_iter()
            .map(|item| TileView {
                id: item.id,
                prompt: item.prompt.clone(),
                category: item.category,
                created_at: item.created_at.clone(),
                removing: item.is_removing(),
            })
            .collect();

        let index = selected
            .and_then(|id| self.tiles.iter().position(|t| t.id == id))
            .or(if self.tiles.is_empty() { None } else { Some(0) });
        self.list_state.select(index);
    }

    pub fn set_filter(&mut self, filter: GalleryFilter, gallery: &Gallery) {
        self.filter = filter;
        self.sync(gallery);
    }

    pub fn selected_tile(&self) -> Option<TileId> {
        self.list_state
            .selected()
            .and_then(|i| self.tiles.get(i))
            .map(|t| t.id)
    }

    pub fn visible_count(&self) -> usize {
        self.tiles.len()
    }

    /// Select the next tile, wrapping to the first
    pub fn next(&mut self) {
        if self.tiles.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((current + 1) % self.tiles.len()));
    }

    /// Select the previous tile, wrapping to the last
    pub fn previous(&mut self) {
        if self.tiles.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let len = self.tiles.len();
        self.list_state.select(Some((current + len - 1) % len));
    }

    /// Draw the filter bar
    pub fn draw_filters(&self, frame: &mut Frame, area: Rect) {
        let filters = GalleryFilter::all();
        let titles: Vec<String> = filters
            .iter()
            .enumerate()
            .map(|(i, f)| match f {
                GalleryFilter::All => format!("{} all", i),
                GalleryFilter::Only(category) => format!("{} {}", i, category.tag()),
            })
            .collect();
        let selected = filters.iter().position(|f| *f == self.filter).unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::BOTTOM))
            .select(selected)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_widget(tabs, area);
    }
}

impl Component for GalleryComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let selected = self.selected_tile();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('f') | KeyCode::Right => Some(Action::NextFilter),
            KeyCode::Char('F') | KeyCode::Left => Some(Action::PrevFilter),
            KeyCode::Char(c @ '0'..='5') => {
                let index = c.to_digit(10).unwrap_or(0) as usize;
                GalleryFilter::all().get(index).copied().map(Action::SetFilter)
            }
            KeyCode::Char('d') => selected.map(|id| Action::Download(ItemRef::Tile(id))),
            KeyCode::Char('s') => selected.map(|id| Action::Share(ItemRef::Tile(id))),
            KeyCode::Char('g') | KeyCode::Enter => {
                selected.map(|id| Action::GenerateSimilar(ItemRef::Tile(id)))
            }
            KeyCode::Char('x') | KeyCode::Delete => selected.map(Action::DeleteTile),
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

        let mut title = format!(" Gallery ({}) ", self.tiles.len());
        if self.filter != GalleryFilter::All {
            title = format!("{} [{}] ", title.trim_end(), self.filter.tag());
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );

        if self.total == 0 || self.tiles.is_empty() {
            let lines = if self.total == 0 {
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Your gallery is empty",
                        Style::default().fg(Color::Yellow),
                    )),
                    Line::from(Span::styled(
                        "Generated images will appear here",
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            } else {
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("No {} images", self.filter.tag()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            };
            let placeholder = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(placeholder, area);
            return Ok(());
        }

        let items: Vec<ListItem> = self
            .tiles
            .iter()
            .map(|tile| {
                let (prompt_style, meta_style) = if tile.removing {
                    (
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                        Style::default().fg(Color::DarkGray),
                    )
                } else {
                    (
                        Style::default().fg(Color::White),
                        Style::default().fg(Color::DarkGray),
                    )
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("{} ", tile.category.icon()),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::styled(tile.prompt.clone(), prompt_style),
                    ]),
                    Line::from(Span::styled(
                        format!("  {} · {}", tile.category, tile.created_at),
                        meta_style,
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
        Ok(())
    }
}
