//! Terminal User Interface management
//!
//! Owns raw mode and the alternate screen, polls terminal events and keeps
//! the tick schedule, so time-based updates run even while keys stream in.

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

/// Fixed-rate tick schedule
#[derive(Debug)]
pub struct TickTimer {
    rate: Duration,
    last: Instant,
}

impl TickTimer {
    pub fn new(rate: Duration) -> Self {
        Self {
            rate,
            last: Instant::now(),
        }
    }

    /// Time left until the next tick
    pub fn remaining(&self) -> Duration {
        self.rate.saturating_sub(self.last.elapsed())
    }

    /// Whether a tick is due. Starts the next period when it is.
    pub fn take(&mut self) -> bool {
        if self.last.elapsed() >= self.rate {
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}

/// Terminal wrapper for managing the TUI lifecycle
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    ticks: TickTimer,
    active: bool,
}

impl Tui {
    pub fn new(tick_rate: Duration) -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            ticks: TickTimer::new(tick_rate),
            active: false,
        })
    }

    /// Enter the alternate screen with raw mode and bracketed paste, so a
    /// pasted prompt arrives as a single `Event::Paste`
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            cursor::Hide
        )?;
        self.active = true;
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableBracketedPaste,
            cursor::Show
        )?;
        Ok(())
    }

    /// Wait for the next event, at most until the next tick is due.
    /// Key releases are dropped (Windows reports them).
    pub fn next_event(&self) -> Result<Option<Event>> {
        if !event::poll(self.ticks.remaining())? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Press => Ok(None),
            event => Ok(Some(event)),
        }
    }

    /// Whether the app should get a `Tick` now
    pub fn tick_due(&mut self) -> bool {
        self.ticks.take()
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
