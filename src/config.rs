use crate::cli::CliOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Where downloads go. Falls back to `$HOME/Downloads` when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Command the image URL is handed to when sharing
    #[serde(default)]
    pub share_command: Option<String>,
    /// No timeout when unset; generation can take minutes
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            download_dir: None,
            share_command: None,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".promptpix"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("promptpix.log"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        Self::from_json(&contents)
    }

    fn from_json(contents: &str) -> Option<Config> {
        serde_json::from_str(contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Apply command-line overrides
    pub fn merge_cli(mut self, opts: &CliOptions) -> Self {
        if let Some(url) = &opts.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(dir) = &opts.download_dir {
            self.download_dir = Some(dir.clone());
        }
        if let Some(command) = &opts.share_command {
            self.share_command = Some(command.clone());
        }
        if let Some(secs) = opts.timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Resolved download directory
    pub fn download_dir_path(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        match env::var("HOME") {
            Ok(home) => PathBuf::from(home).join("Downloads"),
            Err(_) => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
