// Image acquisition endpoints
//
// Uploads go through multipart; remote URLs are checked and optionally
// imported into first-party storage by the backend.

use std::path::Path;

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{ImageCheck, ImageSearchResult, StoredImage};
use crate::rest::ApiClient;

/// A local image file ready to be sent as a multipart part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read `path` and guess its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_owned();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }

    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part, Error> {
        reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(&self.content_type)
            .map_err(Error::Transport)
    }
}

impl ApiClient {
    /// `POST /api/upload/image` (multipart field `image`).
    pub async fn upload_image(&self, upload: ImageUpload) -> Result<StoredImage, Error> {
        debug!(filename = %upload.filename, size = upload.bytes.len(), "uploading image");
        let form = reqwest::multipart::Form::new().part("image", upload.into_part()?);
        self.post_multipart("api/upload/image", form).await
    }

    /// `POST /api/check-image` with `{ url }`.
    pub async fn check_image(&self, url: &str) -> Result<ImageCheck, Error> {
        debug!(url, "checking remote image");
        self.post("api/check-image", &json!({ "url": url })).await
    }

    /// `GET /api/proxy/image?url=...`. Raw bytes, not enveloped.
    pub async fn proxy_image(&self, url: &str) -> Result<(Option<String>, bytes::Bytes), Error> {
        self.get_bytes("api/proxy/image", &[("url", url)]).await
    }

    /// `GET /api/images/search?query=...`
    pub async fn search_images(&self, query: &str) -> Result<Vec<ImageSearchResult>, Error> {
        self.get_query("api/images/search", &[("query", query)])
            .await
    }

    /// `POST /api/images/import` with `{ url }`.
    pub async fn import_image(&self, url: &str) -> Result<StoredImage, Error> {
        debug!(url, "importing remote image");
        self.post("api/images/import", &json!({ "url": url })).await
    }
}
