//! Generation backend client
//!
//! The backend exposes `POST /generate` (form-encoded `prompt`) and serves the
//! generated images. Calls are blocking; they run on worker threads.

use crate::error::{DownloadError, GenerationError, GENERIC_GENERATION_FAILURE};
use crate::model::GenerationRequest;
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Operations the UI needs from the image service
pub trait GenerationBackend: Send + Sync {
    /// Submit a prompt, returning the image locator
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Fetch the bytes of an image
    fn fetch_image(&self, locator: &str) -> Result<Vec<u8>, DownloadError>;

    /// Absolute URL for a locator, suitable for sharing
    fn resolve(&self, locator: &str) -> Result<String, DownloadError>;
}

/// Body of a `/generate` response. Both fields are optional on the wire.
#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret a `/generate` response
pub fn parse_generate_response(status: u16, body: &str) -> Result<String, GenerationError> {
    let parsed = serde_json::from_str::<GenerateResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| r.error)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| GENERIC_GENERATION_FAILURE.to_string());
        return Err(GenerationError::Request(message));
    }

    let response = parsed.map_err(|e| {
        GenerationError::Request(format!("Invalid response from server: {}", e))
    })?;

    match response.image_url {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(GenerationError::Request(
            response
                .error
                .unwrap_or_else(|| "Server response did not include an image URL".to_string()),
        )),
    }
}

/// Parse the backend URL so that relative joins land under its path
pub fn parse_base_url(base_url: &str) -> anyhow::Result<Url> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid backend URL '{}'", base_url))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Join a locator against the backend base URL. Absolute locators pass through.
pub fn resolve_locator(base: &Url, locator: &str) -> Result<Url, DownloadError> {
    base.join(locator)
        .map_err(|_| DownloadError::InvalidLocator(locator.to_string()))
}

/// HTTP implementation of the backend
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// `timeout` of `None` waits for the backend indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .user_agent(concat!("promptpix/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn endpoint(&self) -> Result<Url, GenerationError> {
        self.base_url
            .join("generate")
            .map_err(|e| GenerationError::Request(e.to_string()))
    }
}

impl GenerationBackend for HttpBackend {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = self.endpoint()?;
        log::info!("POST {}", url);

        let response = self
            .client
            .post(url)
            .form(&request.form_fields())
            .send()
            .map_err(|e| GenerationError::Request(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GenerationError::Request(format!("Failed to read response: {}", e)))?;
        log::debug!("/generate answered {} with {} bytes", status, body.len());

        parse_generate_response(status, &body)
    }

    fn fetch_image(&self, locator: &str) -> Result<Vec<u8>, DownloadError> {
        let url = resolve_locator(&self.base_url, locator)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DownloadError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .map_err(|e| DownloadError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn resolve(&self, locator: &str) -> Result<String, DownloadError> {
        resolve_locator(&self.base_url, locator).map(|url| url.to_string())
    }
}
