//! Gallery of generated images
//!
//! Tiles are keyed by `TileId`. Ids are handed out in increasing order, so
//! iterating the map backwards yields the newest tile first.

use super::category::{Category, GalleryFilter};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Fade-out delay between a delete request and removal
pub const TILE_FADE_OUT: Duration = Duration::from_millis(500);

/// Identity of a gallery tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single gallery tile
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub id: TileId,
    pub image_url: String,
    pub prompt: String,
    pub category: Category,
    pub created_at: String,
    /// Set while the tile is fading out
    pub removing_since: Option<Instant>,
}

impl GalleryItem {
    pub fn is_removing(&self) -> bool {
        self.removing_since.is_some()
    }
}

#[derive(Debug, Default)]
pub struct Gallery {
    items: BTreeMap<TileId, GalleryItem>,
    next_id: u64,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile at the front of the gallery
    pub fn add(
        &mut self,
        image_url: impl Into<String>,
        prompt: impl Into<String>,
        created_at: DateTime<Local>,
    ) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;

        let prompt = prompt.into();
        let item = GalleryItem {
            id,
            image_url: image_url.into(),
            category: Category::classify(&prompt),
            prompt,
            created_at: created_at.format("%Y-%m-%d").to_string(),
            removing_since: None,
        };
        self.items.insert(id, item);
        id
    }

    pub fn get(&self, id: TileId) -> Option<&GalleryItem> {
        self.items.get(&id)
    }

    /// Start the fade-out of a tile. Returns false if the tile is unknown or
    /// already fading.
    pub fn begin_remove(&mut self, id: TileId, now: Instant) -> bool {
        match self.items.get_mut(&id) {
            Some(item) if item.removing_since.is_none() => {
                item.removing_since = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Remove every tile whose fade-out has elapsed, returning how many went
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| match item.removing_since {
            Some(since) => now.saturating_duration_since(since) < TILE_FADE_OUT,
            None => true,
        });
        before - self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the empty-gallery placeholder should be displayed
    pub fn shows_placeholder(&self) -> bool {
        self.items.is_empty()
    }

    /// All tiles, newest first
    pub fn iter(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.values().rev()
    }

    /// Tiles matching the filter, newest first
    pub fn visible(&self, filter: GalleryFilter) -> Vec<&GalleryItem> {
        self.iter().filter(|item| filter.matches(item.category)).collect()
    }
}
