//! Sharing image links
//!
//! A configured share command plays the role of the platform share sheet and
//! runs on a worker thread. Without one the URL goes to the system clipboard
//! through `arboard`, or through an OSC 52 escape when no clipboard is
//! reachable (headless sessions, SSH), which most terminal emulators forward.

use crate::error::ShareError;
use base64::engine::general_purpose;
use base64::Engine;
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Destination for copied text
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Build the OSC 52 "set clipboard" sequence for `text`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", general_purpose::STANDARD.encode(text))
}

/// Clipboard writing OSC 52 sequences to a terminal stream
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()
    }
}

/// The desktop clipboard, falling back to OSC 52 when it is unavailable
pub struct SystemClipboard<W: Write> {
    native: Option<arboard::Clipboard>,
    fallback: Osc52Clipboard<W>,
}

impl SystemClipboard<io::Stdout> {
    pub fn new() -> Self {
        let native = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::info!("System clipboard unavailable, using OSC 52: {}", e);
                None
            }
        };
        Self {
            native,
            fallback: Osc52Clipboard::stdout(),
        }
    }
}

impl<W: Write> SystemClipboard<W> {
    /// Clipboard that only ever writes OSC 52 to `out`
    #[cfg(test)]
    pub fn osc52_only(out: W) -> Self {
        Self {
            native: None,
            fallback: Osc52Clipboard::new(out),
        }
    }
}

impl<W: Write> Clipboard for SystemClipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        if let Some(native) = self.native.as_mut() {
            match native.set_text(text) {
                Ok(()) => return Ok(()),
                Err(e) => log::warn!("System clipboard failed, using OSC 52: {}", e),
            }
        }
        self.fallback.copy(text)
    }
}

/// The share command to use, if a non-blank one is configured
pub fn share_command(configured: Option<&str>) -> Option<&str> {
    configured.map(str::trim).filter(|c| !c.is_empty())
}

/// Copy `url` to the clipboard
pub fn copy_url(url: &str, clipboard: &mut dyn Clipboard) -> Result<(), ShareError> {
    clipboard.copy(url).map_err(ShareError::Clipboard)
}

/// Run `command` with the URL appended as its last argument, waiting for it
/// to exit. Blocks; call it from a worker thread.
pub fn run_share_command(command: &str, url: &str) -> Result<(), ShareError> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| ShareError::Share("empty share command".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| ShareError::Share(format!("failed to launch '{}': {}", program, e)))?;

    if !status.success() {
        return Err(ShareError::Share(format!(
            "'{}' exited with {}",
            program, status
        )));
    }

    Ok(())
}
