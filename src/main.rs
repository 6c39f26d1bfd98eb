//! promptpix - generate images from text prompts in the terminal
//!
//! This is the main entry point for the promptpix application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod cli;
mod component;
mod components;
mod config;
mod error;
mod logger;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::cli::CliOptions;
use crate::component::Component;
use crate::config::Config;
use crate::model::ui::Focus;
use crate::services::{HttpBackend, SystemClipboard};
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use log::LevelFilter;
use std::sync::Arc;
use std::time::Duration;

const TICK_RATE: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let opts = CliOptions::parse();
    let config = Config::load().unwrap_or_default().merge_cli(&opts);
    if opts.save_config {
        config.save()?;
    }

    let level = if opts.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Some(log_path) = Config::log_path() {
        if let Err(e) = logger::init(&log_path, level) {
            eprintln!("Logging disabled: {:#}", e);
        }
    }

    let backend = HttpBackend::new(&config.backend_url, config.request_timeout())?;

    // Create app state
    let mut app = App::new(config, Arc::new(backend), Box::new(SystemClipboard::new()));
    app.init()?;

    // Setup terminal
    let mut tui = Tui::new(TICK_RATE)?;
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        log::error!("Exiting after error: {:#}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                log::error!("Draw error: {}", e);
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Paste(text) if app.focus == Focus::Prompt || !app.modals.is_empty() => {
                    Some(Action::PromptPaste(text))
                }
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        }

        // Keep jobs and toasts moving while keys stream in
        if tui.tick_due() {
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
