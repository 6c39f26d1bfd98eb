//! Toast notifications
//!
//! Each toast is shown for `TOAST_DISPLAY`, then fades for `TOAST_FADE_OUT`
//! before it is dropped. Toasts are independent of each other.

use std::time::{Duration, Instant};

pub const TOAST_DISPLAY: Duration = Duration::from_secs(3);
pub const TOAST_FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
}

impl Toast {
    /// Whether the toast is past its display time but not yet removed
    pub fn is_fading(&self, now: Instant) -> bool {
        let age = now.saturating_duration_since(self.created_at);
        age >= TOAST_DISPLAY && age < TOAST_DISPLAY + TOAST_FADE_OUT
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= TOAST_DISPLAY + TOAST_FADE_OUT
    }
}

/// Stack of visible toasts, oldest first
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push_at(message, Severity::Info, Instant::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push_at(message, Severity::Success, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(message, Severity::Error, Instant::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            severity,
            created_at: now,
        });
        id
    }

    /// Drop expired toasts
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
