// Guest endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{EntityId, Guest, GuestInput, GuestStatus};
use crate::rest::ApiClient;

impl ApiClient {
    /// `GET /api/guests[?property_id=...]`
    pub async fn list_guests(&self, property_id: Option<&EntityId>) -> Result<Vec<Guest>, Error> {
        self.get_query("api/guests", &Self::scope(property_id)).await
    }

    /// `GET /api/guests/{id}`
    pub async fn get_guest(&self, id: &EntityId) -> Result<Guest, Error> {
        self.get(&format!("api/guests/{id}")).await
    }

    /// `POST /api/guests`
    pub async fn create_guest(&self, input: &GuestInput) -> Result<Guest, Error> {
        debug!(email = ?input.email, "creating guest");
        self.post("api/guests", input).await
    }

    /// `PUT /api/guests/{id}`
    pub async fn update_guest(&self, id: &EntityId, input: &GuestInput) -> Result<Guest, Error> {
        self.put(&format!("api/guests/{id}"), input).await
    }

    /// `PATCH /api/guests/{id}/status` with `{ status }`.
    pub async fn set_guest_status(
        &self,
        id: &EntityId,
        status: GuestStatus,
    ) -> Result<Option<Guest>, Error> {
        debug!(%id, %status, "updating guest status");
        self.patch(&format!("api/guests/{id}/status"), &json!({ "status": status }))
            .await
    }

    /// `DELETE /api/guests/{id}`
    pub async fn delete_guest(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting guest");
        self.delete(&format!("api/guests/{id}")).await
    }
}
