// Streaming service endpoints
//
// Unlike activities, streaming services persist a reorder by sending the
// complete renumbered set.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{EntityId, OrderEntry, StreamingInput, StreamingService};
use crate::rest::ApiClient;

impl ApiClient {
    /// `GET /api/streaming-services[?property_id=...]`
    pub async fn list_streaming(
        &self,
        property_id: Option<&EntityId>,
    ) -> Result<Vec<StreamingService>, Error> {
        self.get_query("api/streaming-services", &Self::scope(property_id))
            .await
    }

    /// `POST /api/streaming-services`
    pub async fn create_streaming(
        &self,
        input: &StreamingInput,
    ) -> Result<StreamingService, Error> {
        debug!(name = ?input.service_name, "creating streaming service");
        self.post("api/streaming-services", input).await
    }

    /// `PUT /api/streaming-services/{id}`
    pub async fn update_streaming(
        &self,
        id: &EntityId,
        input: &StreamingInput,
    ) -> Result<StreamingService, Error> {
        self.put(&format!("api/streaming-services/{id}"), input)
            .await
    }

    /// `PATCH /api/streaming-services/{id}/toggle`
    pub async fn toggle_streaming(
        &self,
        id: &EntityId,
        active: bool,
    ) -> Result<Option<StreamingService>, Error> {
        debug!(%id, active, "toggling streaming service");
        self.patch(
            &format!("api/streaming-services/{id}/toggle"),
            &json!({ "is_active": active }),
        )
        .await
    }

    /// `PUT /api/streaming-services/reorder` with `{ items: [{ id, display_order }] }`.
    pub async fn reorder_streaming(&self, items: &[OrderEntry]) -> Result<(), Error> {
        debug!(count = items.len(), "reordering streaming services");
        self.put_unit("api/streaming-services/reorder", &json!({ "items": items }))
            .await
    }

    /// `DELETE /api/streaming-services/{id}`
    pub async fn delete_streaming(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting streaming service");
        self.delete(&format!("api/streaming-services/{id}")).await
    }
}
