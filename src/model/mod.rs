//! Model layer - the view-model the UI renders from
//!
//! - `GenerationFlow` - submission state, last result and error
//! - `Gallery` - tiles keyed by identity
//! - `HistoryStrip` - recent generations, capped FIFO
//! - `ToastStack` - transient notifications
//! - `ModalStack` - overlay management

pub mod category;
pub mod gallery;
pub mod generation;
pub mod history;
pub mod modal;
pub mod toast;
pub mod ui;

pub use category::{Category, GalleryFilter};
pub use gallery::{Gallery, GalleryItem, TileId};
pub use generation::{GenerationFlow, GenerationRequest, GenerationResult, Ticket};
pub use history::{HistoryItem, HistoryStrip};
pub use toast::{Severity, Toast, ToastStack};
