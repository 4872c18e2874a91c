// ── Image acquisition responses ──

use serde::{Deserialize, Serialize};

/// `data` of `POST /api/upload/image` and `POST /api/images/import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    #[serde(alias = "imageUrl", alias = "image_url")]
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// `data` of `POST /api/check-image`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCheck {
    #[serde(default, alias = "valid")]
    pub accessible: bool,
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// One hit from `GET /api/images/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSearchResult {
    pub url: String,
    #[serde(default, alias = "thumbnailUrl", alias = "thumb")]
    pub thumbnail_url: Option<String>,
    #[serde(default, alias = "alt")]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}
