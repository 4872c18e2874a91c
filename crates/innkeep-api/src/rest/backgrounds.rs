// Background image endpoints

use tracing::debug;

use crate::error::Error;
use crate::models::{BackgroundImage, EntityId};
use crate::rest::ApiClient;
use crate::rest::images::ImageUpload;

impl ApiClient {
    /// `GET /api/background-images[?property_id=...]`
    pub async fn list_backgrounds(
        &self,
        property_id: Option<&EntityId>,
    ) -> Result<Vec<BackgroundImage>, Error> {
        self.get_query("api/background-images", &Self::scope(property_id))
            .await
    }

    /// `POST /api/background-images` as multipart: `image`, `property_id`
    /// and an optional `season` tag.
    pub async fn upload_background(
        &self,
        property_id: &EntityId,
        season: Option<&str>,
        upload: ImageUpload,
    ) -> Result<BackgroundImage, Error> {
        debug!(%property_id, ?season, filename = %upload.filename, "uploading background");
        let mut form = reqwest::multipart::Form::new()
            .text("property_id", property_id.to_string())
            .part("image", upload.into_part()?);
        if let Some(season) = season {
            form = form.text("season", season.to_owned());
        }
        self.post_multipart("api/background-images", form).await
    }

    /// `DELETE /api/background-images/{id}`
    pub async fn delete_background(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting background");
        self.delete(&format!("api/background-images/{id}")).await
    }
}
