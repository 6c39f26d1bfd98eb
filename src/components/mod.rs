//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod gallery;
pub mod help_dialog;
pub mod history;
pub mod layout;
pub mod prompt;
pub mod quit_dialog;
pub mod result;
pub mod subscribe_dialog;
pub mod toast;

pub use gallery::GalleryComponent;
pub use help_dialog::HelpDialog;
pub use history::HistoryComponent;
pub use layout::{calculate_main_layout, centered_popup, MainLayout};
pub use prompt::PromptComponent;
pub use quit_dialog::QuitDialog;
pub use result::{PreviewState, ResultComponent};
pub use subscribe_dialog::SubscribeDialog;
pub use toast::draw_toasts;
