// Property endpoints, plus settings and the dashboard counters.

use tracing::debug;

use crate::error::Error;
use crate::models::{DashboardStats, EntityId, Property, PropertyInput, Settings};
use crate::rest::ApiClient;

impl ApiClient {
    /// `GET /api/properties`
    pub async fn list_properties(&self) -> Result<Vec<Property>, Error> {
        self.get("api/properties").await
    }

    /// `GET /api/properties/{id}`
    pub async fn get_property(&self, id: &EntityId) -> Result<Property, Error> {
        self.get(&format!("api/properties/{id}")).await
    }

    /// `POST /api/properties`
    pub async fn create_property(&self, input: &PropertyInput) -> Result<Property, Error> {
        debug!(name = ?input.name, "creating property");
        self.post("api/properties", input).await
    }

    /// `PUT /api/properties/{id}`
    pub async fn update_property(
        &self,
        id: &EntityId,
        input: &PropertyInput,
    ) -> Result<Property, Error> {
        self.put(&format!("api/properties/{id}"), input).await
    }

    /// `DELETE /api/properties/{id}`
    pub async fn delete_property(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "deleting property");
        self.delete(&format!("api/properties/{id}")).await
    }

    /// `GET /api/settings`
    pub async fn get_settings(&self) -> Result<Settings, Error> {
        self.get("api/settings").await
    }

    /// `PUT /api/settings` with the complete key/value map.
    pub async fn update_settings(&self, settings: &Settings) -> Result<(), Error> {
        self.put_unit("api/settings", settings).await
    }

    /// `GET /api/dashboard/stats`
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        self.get("api/dashboard/stats").await
    }
}
