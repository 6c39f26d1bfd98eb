//! Saving generated images to disk

use crate::error::DownloadError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters of the prompt kept in the file name
const FILE_NAME_PROMPT_CHARS: usize = 20;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// File name for a downloaded image: `ai-image-<prompt head>-<millis>.png`
pub fn download_file_name(prompt: &str, timestamp_millis: i64) -> String {
    let head: String = prompt
        .chars()
        .take(FILE_NAME_PROMPT_CHARS)
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let head = WHITESPACE_REGEX.replace_all(&head, "-");
    format!("ai-image-{}-{}.png", head, timestamp_millis)
}

/// Write image bytes into `dir`, creating it if needed
pub fn save_image(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}
