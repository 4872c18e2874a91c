// Property information endpoints (amenities, house guides, services).

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{EntityId, OrderEntry, PropertyInfoInput, PropertyInfoItem};
use crate::rest::ApiClient;

impl ApiClient {
    /// `GET /api/property-information[?property_id=...]`
    pub async fn list_property_info(
        &self,
        property_id: Option<&EntityId>,
    ) -> Result<Vec<PropertyInfoItem>, Error> {
        self.get_query("api/property-information", &Self::scope(property_id))
            .await
    }

    /// `POST /api/property-information`
    pub async fn create_property_info(
        &self,
        input: &PropertyInfoInput,
    ) -> Result<PropertyInfoItem, Error> {
        debug!(title = ?input.title, "creating property information");
        self.post("api/property-information", input).await
    }

    /// `PUT /api/property-information/{id}`
    pub async fn update_property_info(
        &self,
        id: &EntityId,
        input: &PropertyInfoInput,
    ) -> Result<PropertyInfoItem, Error> {
        self.put(&format!("api/property-information/{id}"), input)
            .await
    }

    /// `PATCH /api/property-information/{id}/toggle`
    pub async fn toggle_property_info(
        &self,
        id: &EntityId,
        active: bool,
    ) -> Result<Option<PropertyInfoItem>, Error> {
        debug!(%id, active, "toggling property information");
        self.patch(
            &format!("api/property-information/{id}/toggle"),
            &json!({ "is_active": active }),
        )
        .await
    }

    /// `PUT /api/property-information/reorder` with the full set.
    pub async fn reorder_property_info(&self, items: &[OrderEntry]) -> Result<(), Error> {
        debug!(count = items.len(), "reordering property information");
        self.put_unit(
            "api/property-information/reorder",
            &json!({ "items": items }),
        )
        .await
    }

    /// `DELETE /api/property-information/{id}`
    pub async fn delete_property_info(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting property information");
        self.delete(&format!("api/property-information/{id}")).await
    }
}
