//! File logger for the `log` facade
//!
//! The terminal belongs to the UI, so records are appended to a file instead
//! of being printed.

use anyhow::Context;
use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

/// One log line: `<timestamp> [LEVEL] target: message`
pub fn format_line(timestamp: &str, level: Level, target: &str, args: &fmt::Arguments) -> String {
    format!("{} [{:<5}] {}: {}", timestamp, level, target, args)
}

/// Install the file logger, appending to `path`
pub fn init(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let logger = LOGGER.get_or_init(|| FileLogger {
        file: Mutex::new(file),
        level,
    });

    log::set_logger(logger).map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;
    log::set_max_level(level);
    Ok(())
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let line = format_line(&timestamp, record.level(), record.target(), record.args());

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
