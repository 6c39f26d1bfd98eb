//! CLI parser
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[clap(name = "promptpix", version, about = "Generate images from text prompts in the terminal")]
/// CLI Options
pub struct CliOptions {
    #[clap(long, env = "PROMPTPIX_BACKEND_URL")]
    /// Base URL of the generation backend, eg `http://127.0.0.1:5000`.
    /// Env: PROMPTPIX_BACKEND_URL
    pub backend_url: Option<String>,

    #[clap(long, env = "PROMPTPIX_DOWNLOAD_DIR")]
    /// Directory downloaded images are written to.
    /// Env: PROMPTPIX_DOWNLOAD_DIR
    pub download_dir: Option<PathBuf>,

    #[clap(long, env = "PROMPTPIX_SHARE_COMMAND")]
    /// Command run with the image URL appended when sharing, eg `xdg-open`.
    /// Without one, URLs are copied to the clipboard.
    pub share_command: Option<String>,

    #[clap(long, env = "PROMPTPIX_TIMEOUT_SECS")]
    /// Give up on backend requests after this many seconds, 0 for never.
    /// Env: PROMPTPIX_TIMEOUT_SECS
    pub timeout_secs: Option<u64>,

    #[clap(long, help = "Enable debug logging", env = "PROMPTPIX_DEBUG")]
    /// Enable debug logging. Env: PROMPTPIX_DEBUG
    pub debug: bool,

    #[clap(long)]
    /// Write the merged settings back to the config file
    pub save_config: bool,
}
