//! Background job runner service
//!
//! Backend calls block, so each one runs on its own thread and reports back
//! through a channel that the UI drains on every tick.

use crate::error::GenerationError;
use crate::model::{GenerationRequest, Ticket};
use crate::services::backend::GenerationBackend;
use crate::services::download::{download_file_name, save_image};
use crate::services::preview::{decode_preview, PreviewImage};
use crate::services::share::run_share_command;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Results reported by worker threads
#[derive(Debug)]
pub enum JobMessage {
    Generated {
        ticket: Ticket,
        outcome: Result<String, GenerationError>,
    },
    Downloaded {
        outcome: Result<PathBuf, String>,
    },
    Preview {
        image_url: String,
        outcome: Result<PreviewImage, String>,
    },
    Shared {
        url: String,
        outcome: Result<(), String>,
    },
}

/// Job runner for backend requests
pub struct JobRunner {
    backend: Arc<dyn GenerationBackend>,
    sender: Sender<JobMessage>,
    receiver: Receiver<JobMessage>,
}

impl JobRunner {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            backend,
            sender,
            receiver,
        }
    }

    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    /// Submit a generation request
    pub fn spawn_generation(&self, ticket: Ticket, request: GenerationRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.sender.clone();

        thread::spawn(move || {
            let outcome = backend.generate(&request);
            let _ = tx.send(JobMessage::Generated { ticket, outcome });
        });
    }

    /// Fetch an image and write it into `dir`
    pub fn spawn_download(&self, locator: String, prompt: String, dir: PathBuf) {
        let backend = Arc::clone(&self.backend);
        let tx = self.sender.clone();

        thread::spawn(move || {
            let outcome = backend
                .fetch_image(&locator)
                .and_then(|bytes| {
                    let millis = chrono::Local::now().timestamp_millis();
                    save_image(&dir, &download_file_name(&prompt, millis), &bytes)
                })
                .map_err(|e| e.to_string());
            let _ = tx.send(JobMessage::Downloaded { outcome });
        });
    }

    /// Fetch and decode an image for the result pane
    pub fn spawn_preview(&self, image_url: String) {
        let backend = Arc::clone(&self.backend);
        let tx = self.sender.clone();

        thread::spawn(move || {
            let outcome = backend
                .fetch_image(&image_url)
                .map_err(|e| e.to_string())
                .and_then(|bytes| decode_preview(&bytes).map_err(|e| e.to_string()));
            let _ = tx.send(JobMessage::Preview { image_url, outcome });
        });
    }

    /// Hand `url` to the share command
    pub fn spawn_share(&self, command: String, url: String) {
        let tx = self.sender.clone();

        thread::spawn(move || {
            let outcome = run_share_command(&command, &url).map_err(|e| e.to_string());
            let _ = tx.send(JobMessage::Shared { url, outcome });
        });
    }

    /// Drain every message that has arrived since the last poll
    pub fn poll(&self) -> Vec<JobMessage> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => messages.push(message),
                // The runner owns a sender, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}
