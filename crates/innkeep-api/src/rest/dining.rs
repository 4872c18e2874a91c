// Dining endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{DiningInput, DiningPlace, EntityId};
use crate::rest::ApiClient;

impl ApiClient {
    /// `GET /api/dining[?property_id=...]`
    pub async fn list_dining(
        &self,
        property_id: Option<&EntityId>,
    ) -> Result<Vec<DiningPlace>, Error> {
        self.get_query("api/dining", &Self::scope(property_id)).await
    }

    /// `POST /api/dining`
    pub async fn create_dining(&self, input: &DiningInput) -> Result<DiningPlace, Error> {
        debug!(name = ?input.name_en, "creating dining place");
        self.post("api/dining", input).await
    }

    /// `PUT /api/dining/{id}`
    pub async fn update_dining(
        &self,
        id: &EntityId,
        input: &DiningInput,
    ) -> Result<DiningPlace, Error> {
        self.put(&format!("api/dining/{id}"), input).await
    }

    /// `PATCH /api/dining/{id}/toggle`
    pub async fn toggle_dining(
        &self,
        id: &EntityId,
        active: bool,
    ) -> Result<Option<DiningPlace>, Error> {
        debug!(%id, active, "toggling dining place");
        self.patch(
            &format!("api/dining/{id}/toggle"),
            &json!({ "is_active": active }),
        )
        .await
    }

    /// `DELETE /api/dining/{id}`
    pub async fn delete_dining(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting dining place");
        self.delete(&format!("api/dining/{id}")).await
    }
}
