//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{GalleryFilter, TileId};
use std::fmt;

/// Which image an item action applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef {
    /// The image in the result pane
    Result,
    /// A gallery tile
    Tile(TileId),
    /// A history entry, by position (0 = newest)
    History(usize),
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Result => write!(f, "result"),
            ItemRef::Tile(id) => write!(f, "tile {}", id),
            ItemRef::History(index) => write!(f, "history[{}]", index),
        }
    }
}

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for job polling and timers
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────────
    /// Move focus to the next pane
    FocusNext,
    /// Move focus to the previous pane
    FocusPrev,
    /// Jump back to the prompt input
    FocusPrompt,

    // ─────────────────────────────────────────────────────────────────────────
    // Prompt
    // ─────────────────────────────────────────────────────────────────────────
    /// Add character to the prompt
    PromptInput(char),
    /// Remove last character from the prompt
    PromptBackspace,
    /// Clear the prompt
    PromptClear,
    /// Insert pasted text into the prompt
    PromptPaste(String),
    /// Submit the prompt for generation
    SubmitPrompt,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next item in the focused list
    NextItem,
    /// Move to previous item in the focused list
    PrevItem,

    // ─────────────────────────────────────────────────────────────────────────
    // Gallery Filter
    // ─────────────────────────────────────────────────────────────────────────
    /// Cycle to the next filter button
    NextFilter,
    /// Cycle to the previous filter button
    PrevFilter,
    /// Activate a filter
    SetFilter(GalleryFilter),

    // ═════════════════════════════════════════════════════════════════════════
    // Item Actions
    // ═════════════════════════════════════════════════════════════════════════
    /// Save the image to the download directory
    Download(ItemRef),
    /// Share the image URL
    Share(ItemRef),
    /// Add the current result to the gallery
    SaveToGallery,
    /// Copy the item's prompt into the input
    GenerateSimilar(ItemRef),
    /// Fade out and remove a gallery tile
    DeleteTile(TileId),

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open the newsletter dialog
    OpenSubscribe,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Submit the newsletter form
    Subscribe(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Misc
    // ─────────────────────────────────────────────────────────────────────────
    /// Theme toggle (dark is the only theme)
    ToggleTheme,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::FocusNext => write!(f, "FocusNext"),
            Action::FocusPrev => write!(f, "FocusPrev"),
            Action::FocusPrompt => write!(f, "FocusPrompt"),
            Action::PromptInput(c) => write!(f, "PromptInput('{}')", c),
            Action::PromptBackspace => write!(f, "PromptBackspace"),
            Action::PromptClear => write!(f, "PromptClear"),
            Action::PromptPaste(text) => write!(f, "PromptPaste({} chars)", text.chars().count()),
            Action::SubmitPrompt => write!(f, "SubmitPrompt"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::NextFilter => write!(f, "NextFilter"),
            Action::PrevFilter => write!(f, "PrevFilter"),
            Action::SetFilter(filter) => write!(f, "SetFilter({})", filter.tag()),
            Action::Download(item) => write!(f, "Download({})", item),
            Action::Share(item) => write!(f, "Share({})", item),
            Action::SaveToGallery => write!(f, "SaveToGallery"),
            Action::GenerateSimilar(item) => write!(f, "GenerateSimilar({})", item),
            Action::DeleteTile(id) => write!(f, "DeleteTile({})", id),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenSubscribe => write!(f, "OpenSubscribe"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::Subscribe(_) => write!(f, "Subscribe"),
            Action::ToggleTheme => write!(f, "ToggleTheme"),
        }
    }
}
