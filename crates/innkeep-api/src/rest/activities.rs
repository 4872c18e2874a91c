// Activity endpoints
//
// Activities persist a reorder one row at a time: the moved item's new
// index goes to `PATCH /order` and the server shifts its neighbours.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{Activity, ActivityInput, EntityId};
use crate::rest::ApiClient;

impl ApiClient {
    /// `GET /api/activities[?property_id=...]`
    pub async fn list_activities(
        &self,
        property_id: Option<&EntityId>,
    ) -> Result<Vec<Activity>, Error> {
        self.get_query("api/activities", &Self::scope(property_id))
            .await
    }

    /// `POST /api/activities`
    pub async fn create_activity(&self, input: &ActivityInput) -> Result<Activity, Error> {
        debug!(title = ?input.title, "creating activity");
        self.post("api/activities", input).await
    }

    /// `PUT /api/activities/{id}`
    pub async fn update_activity(
        &self,
        id: &EntityId,
        input: &ActivityInput,
    ) -> Result<Activity, Error> {
        self.put(&format!("api/activities/{id}"), input).await
    }

    /// `PATCH /api/activities/{id}/toggle`
    pub async fn toggle_activity(
        &self,
        id: &EntityId,
        active: bool,
    ) -> Result<Option<Activity>, Error> {
        debug!(%id, active, "toggling activity");
        self.patch(
            &format!("api/activities/{id}/toggle"),
            &json!({ "is_active": active }),
        )
        .await
    }

    /// `PATCH /api/activities/{id}/order` with `{ display_order }`.
    pub async fn move_activity(&self, id: &EntityId, new_index: u32) -> Result<(), Error> {
        debug!(%id, new_index, "reordering activity");
        self.patch::<serde_json::Value>(
            &format!("api/activities/{id}/order"),
            &json!({ "display_order": new_index }),
        )
        .await?;
        Ok(())
    }

    /// `DELETE /api/activities/{id}`
    pub async fn delete_activity(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting activity");
        self.delete(&format!("api/activities/{id}")).await
    }
}
