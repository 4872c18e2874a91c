// MDM endpoints
//
// Device commands are fire-and-forget POSTs: the backend queues them and
// the device picks them up on its next check-in. Command outcomes are only
// visible through the command history.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{
    CommandRequest, ConfigurationProfile, Device, EntityId, KioskEnableRequest, KioskPreset,
    MdmAlert, MdmCommand, MdmStats, MetricSample,
};
use crate::rest::ApiClient;

impl ApiClient {
    // ── Inventory ────────────────────────────────────────────────────

    /// `GET /api/mdm/devices[?property_id=...]`
    pub async fn list_devices(&self, property_id: Option<&EntityId>) -> Result<Vec<Device>, Error> {
        self.get_query("api/mdm/devices", &Self::scope(property_id))
            .await
    }

    /// `GET /api/mdm/devices/{id}`
    pub async fn get_device(&self, id: &EntityId) -> Result<Device, Error> {
        self.get(&format!("api/mdm/devices/{id}")).await
    }

    /// `GET /api/mdm/devices/{id}/metrics`
    pub async fn device_metrics(&self, id: &EntityId) -> Result<Vec<MetricSample>, Error> {
        self.get(&format!("api/mdm/devices/{id}/metrics")).await
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `POST /api/mdm/devices/{id}/commands` with `{ commandType, payload, priority }`.
    pub async fn send_command(
        &self,
        id: &EntityId,
        request: &CommandRequest,
    ) -> Result<Option<MdmCommand>, Error> {
        debug!(%id, command = %request.command_type, "queueing command");
        self.post_echo(&format!("api/mdm/devices/{id}/commands"), request)
            .await
    }

    /// `GET /api/mdm/devices/{id}/commands`
    pub async fn command_history(&self, id: &EntityId) -> Result<Vec<MdmCommand>, Error> {
        self.get(&format!("api/mdm/devices/{id}/commands")).await
    }

    /// `POST /api/mdm/devices/{id}/enroll`
    pub async fn enroll_device(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "enrolling device");
        self.device_action(id, "enroll", &json!({})).await
    }

    /// `POST /api/mdm/devices/{id}/restart`
    pub async fn restart_device(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "restarting device");
        self.device_action(id, "restart", &json!({})).await
    }

    /// `POST /api/mdm/devices/{id}/kiosk/enable` with a custom app list.
    pub async fn enable_kiosk(
        &self,
        id: &EntityId,
        request: &KioskEnableRequest,
    ) -> Result<(), Error> {
        debug!(%id, apps = request.allowed_apps.len(), "enabling kiosk mode");
        self.device_action(id, "kiosk/enable", request).await
    }

    /// `POST /api/mdm/devices/{id}/kiosk/disable`
    pub async fn disable_kiosk(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "disabling kiosk mode");
        self.device_action(id, "kiosk/disable", &json!({})).await
    }

    /// `POST /api/mdm/devices/{id}/kiosk/preset` with `{ presetId }`.
    pub async fn apply_kiosk_preset(
        &self,
        id: &EntityId,
        preset_id: &EntityId,
    ) -> Result<(), Error> {
        debug!(%id, %preset_id, "applying kiosk preset");
        self.device_action(id, "kiosk/preset", &json!({ "presetId": preset_id }))
            .await
    }

    /// `POST /api/mdm/devices/{id}/notification` with `{ title, message }`.
    pub async fn send_notification(
        &self,
        id: &EntityId,
        title: &str,
        message: &str,
    ) -> Result<(), Error> {
        debug!(%id, title, "sending test notification");
        self.device_action(
            id,
            "notification",
            &json!({ "title": title, "message": message }),
        )
        .await
    }

    /// `POST /api/mdm/devices/{id}/profiles/{profile_id}`
    pub async fn apply_profile(&self, id: &EntityId, profile_id: &EntityId) -> Result<(), Error> {
        debug!(%id, %profile_id, "applying configuration profile");
        self.device_action(id, &format!("profiles/{profile_id}"), &json!({}))
            .await
    }

    async fn device_action(
        &self,
        id: &EntityId,
        action: &str,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<(), Error> {
        self.post_unit(&format!("api/mdm/devices/{id}/{action}"), body)
            .await
    }

    // ── Catalogues, alerts, stats ────────────────────────────────────

    /// `GET /api/mdm/kiosk/presets`
    pub async fn list_kiosk_presets(&self) -> Result<Vec<KioskPreset>, Error> {
        self.get("api/mdm/kiosk/presets").await
    }

    /// `GET /api/mdm/profiles`
    pub async fn list_profiles(&self) -> Result<Vec<ConfigurationProfile>, Error> {
        self.get("api/mdm/profiles").await
    }

    /// `GET /api/mdm/alerts`. Server order is preserved.
    pub async fn list_alerts(&self) -> Result<Vec<MdmAlert>, Error> {
        self.get("api/mdm/alerts").await
    }

    /// `PUT /api/mdm/alerts/{id}/resolve`
    pub async fn resolve_alert(&self, id: &EntityId) -> Result<(), Error> {
        debug!(%id, "resolving alert");
        self.put_unit(&format!("api/mdm/alerts/{id}/resolve"), &json!({}))
            .await
    }

    /// `GET /api/mdm/stats`
    pub async fn mdm_stats(&self) -> Result<MdmStats, Error> {
        self.get("api/mdm/stats").await
    }
}
