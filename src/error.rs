//! Domain errors surfaced to the user
//!
//! Application plumbing uses `anyhow`; these enums cover the failures that
//! end up in the error pane or an error toast.

use thiserror::Error;

/// Message shown when the backend gives no usable explanation
pub const GENERIC_GENERATION_FAILURE: &str = "Failed to generate image";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Prompt empty after trimming. Never reaches the network.
    #[error("Please enter a prompt for the image generation")]
    EmptyPrompt,
    /// A submission is already waiting for the backend
    #[error("A generation is already in progress")]
    InFlight,
    /// Non-success status, malformed payload or network fault
    #[error("{0}")]
    Request(String),
}

impl GenerationError {
    /// Validation errors are caught locally, before any request is made
    pub fn is_validation(&self) -> bool {
        matches!(self, GenerationError::EmptyPrompt)
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Error sharing: {0}")]
    Share(String),
    #[error("Failed to copy URL")]
    Clipboard(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid image location '{0}'")]
    InvalidLocator(String),
    #[error("Download failed: {0}")]
    Request(String),
    #[error("Download failed: HTTP status {0}")]
    Status(u16),
    #[error("Could not save image: {0}")]
    Io(#[from] std::io::Error),
}
