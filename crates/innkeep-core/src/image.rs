// ── Image source selection ──
//
// Image-bearing forms take an image from exactly one of three places:
// a local upload, an external URL, or a backend image search. The form
// keeps only the active mode's input, so switching modes discards the
// previous one and the submission can only ever carry the resolved URL.

use std::path::{Path, PathBuf};

use innkeep_api::models::{ImageCheck, ImageSearchResult};
use innkeep_api::{ApiClient, ImageUpload};
use strum::{Display, EnumString};
use tracing::debug;
use url::Url;

use crate::error::CoreError;

/// Upload ceiling enforced before anything is sent.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageMode {
    Upload,
    Url,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Local file sent as multipart.
    Upload(PathBuf),
    /// External URL; `import` copies it into first-party storage.
    Url { url: String, import: bool },
    /// A hit from the backend image search, always imported.
    Search(ImageSearchResult),
}

impl ImageSource {
    pub fn mode(&self) -> ImageMode {
        match self {
            Self::Upload(_) => ImageMode::Upload,
            Self::Url { .. } => ImageMode::Url,
            Self::Search(_) => ImageMode::Search,
        }
    }
}

/// Form state for one image field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageForm {
    source: Option<ImageSource>,
}

impl ImageForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.source = Some(ImageSource::Upload(path.into()));
        self
    }

    pub fn url(&mut self, url: impl Into<String>, import: bool) -> &mut Self {
        self.source = Some(ImageSource::Url {
            url: url.into(),
            import,
        });
        self
    }

    pub fn search_result(&mut self, result: ImageSearchResult) -> &mut Self {
        self.source = Some(ImageSource::Search(result));
        self
    }

    pub fn clear(&mut self) {
        self.source = None;
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn mode(&self) -> Option<ImageMode> {
        self.source.as_ref().map(ImageSource::mode)
    }

    /// Validate, then resolve the active source to the URL the entity
    /// should store. `None` when no image was chosen.
    pub async fn resolve(&self, client: &ApiClient) -> Result<Option<String>, CoreError> {
        match &self.source {
            Some(source) => resolve(source, client).await.map(Some),
            None => Ok(None),
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────

/// Allow-list check on the file's extension-derived MIME type.
pub fn check_file_type(path: &Path) -> Result<&'static str, CoreError> {
    let guessed = mime_guess::from_path(path).first_raw().unwrap_or_default();
    ALLOWED_MIME_TYPES
        .iter()
        .find(|allowed| **allowed == guessed)
        .copied()
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!(
                "{} is not a supported image (jpeg, png, gif, webp)",
                path.display()
            ),
        })
}

pub fn check_file_size(path: &Path, size: u64) -> Result<(), CoreError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(CoreError::ValidationFailed {
            message: format!(
                "{} is {} bytes; the limit is {MAX_UPLOAD_BYTES}",
                path.display(),
                size
            ),
        });
    }
    Ok(())
}

/// Only absolute `http(s)` URLs are accepted.
pub fn check_url(raw: &str) -> Result<Url, CoreError> {
    let url = Url::parse(raw.trim()).map_err(|e| CoreError::ValidationFailed {
        message: format!("invalid image URL {raw:?}: {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::ValidationFailed {
            message: format!("image URL must use http or https, not {other}"),
        }),
    }
}

/// Media type without parameters, lowercased (`image/PNG; q=1` → `image/png`).
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn check_content_type(url: &Url, content_type: &str) -> Result<(), CoreError> {
    let essence = essence(content_type);
    if ALLOWED_MIME_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            message: format!("{url} serves {essence}, not a supported image (jpeg, png, gif, webp)"),
        })
    }
}

/// Judge the backend's check of an external URL: it must be reachable,
/// and any type or size it reports must pass the same limits as uploads.
pub fn check_remote(url: &Url, check: &ImageCheck) -> Result<(), CoreError> {
    if !check.accessible {
        return Err(CoreError::ValidationFailed {
            message: format!("image at {url} is not reachable"),
        });
    }
    if let Some(content_type) = check.content_type.as_deref() {
        check_content_type(url, content_type)?;
    }
    match check.size {
        Some(size) if size > MAX_UPLOAD_BYTES => Err(CoreError::ValidationFailed {
            message: format!("image at {url} is {size} bytes; the limit is {MAX_UPLOAD_BYTES}"),
        }),
        _ => Ok(()),
    }
}

// ── Proxy fetch ─────────────────────────────────────────────────────

/// An external image fetched through the backend's CORS-safe proxy.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

pub async fn fetch(raw_url: &str, client: &ApiClient) -> Result<ProxiedImage, CoreError> {
    let url = check_url(raw_url)?;
    let (content_type, data) = client.proxy_image(url.as_str()).await?;
    if let Some(ct) = content_type.as_deref() {
        check_content_type(&url, ct)?;
    }
    let size = u64::try_from(data.len()).unwrap_or(u64::MAX);
    if size > MAX_UPLOAD_BYTES {
        return Err(CoreError::ValidationFailed {
            message: format!("image at {url} is {size} bytes; the limit is {MAX_UPLOAD_BYTES}"),
        });
    }
    debug!(%url, size, "image fetched through proxy");
    Ok(ProxiedImage {
        content_type,
        data: data.to_vec(),
    })
}

// ── Resolution ──────────────────────────────────────────────────────

pub async fn resolve(source: &ImageSource, client: &ApiClient) -> Result<String, CoreError> {
    match source {
        ImageSource::Upload(path) => {
            check_file_type(path)?;
            let size = tokio::fs::metadata(path)
                .await
                .map_err(|e| CoreError::ValidationFailed {
                    message: format!("cannot read {}: {e}", path.display()),
                })?
                .len();
            check_file_size(path, size)?;
            let upload = ImageUpload::from_path(path).await?;
            let stored = client.upload_image(upload).await?;
            debug!(url = %stored.url, "image uploaded");
            Ok(stored.url)
        }
        ImageSource::Url { url, import } => {
            let url = check_url(url)?;
            let check = client.check_image(url.as_str()).await?;
            check_remote(&url, &check)?;
            if *import {
                Ok(client.import_image(url.as_str()).await?.url)
            } else {
                Ok(url.to_string())
            }
        }
        ImageSource::Search(hit) => {
            check_url(&hit.url)?;
            Ok(client.import_image(&hit.url).await?.url)
        }
    }
}
