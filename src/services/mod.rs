//! External service interactions
//!
//! This module contains services for talking to the outside world:
//! - The generation backend (HTTP)
//! - Image downloads to disk
//! - Sharing through a command or the clipboard
//! - Image decoding for the terminal preview
//! - Background job execution

pub mod backend;
pub mod download;
pub mod job_runner;
pub mod preview;
pub mod share;

pub use backend::{GenerationBackend, HttpBackend};
pub use job_runner::{JobMessage, JobRunner};
pub use preview::PreviewImage;
pub use share::{copy_url, share_command, Clipboard, SystemClipboard};
