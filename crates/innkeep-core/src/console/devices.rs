// ── MDM device console ──
//
// Device inventory, remote commands, kiosk mode, alerts and monitoring.
// Commands are single POSTs with one notification each; their outcome is
// never applied optimistically. The poll task keeps the inventory fresh.

use std::sync::Arc;

use innkeep_api::models::CommandRequest;
use tracing::debug;

use super::Console;
use crate::error::CoreError;
use crate::kiosk::{KioskConfigBuilder, KioskSubmission};
use crate::model::{
    ConfigurationProfile, Device, Entity, EntityId, KioskPreset, MdmAlert, MdmCommand, MdmStats,
    MetricSample,
};
use crate::store::OperationId;

impl Console {
    // ── Inventory ────────────────────────────────────────────────────

    pub(crate) async fn fetch_devices(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<Device>>, CoreError> {
        let client = self.client();
        let devices = Self::refresh(&self.inner.store.devices, scope, client.list_devices(scope))
            .await?;
        self.inner.store.touch_device_poll();
        Ok(devices)
    }

    /// Targeted refetch of one device row.
    pub(crate) async fn fetch_device(&self, id: &EntityId) -> Result<Arc<Device>, CoreError> {
        let device = self.client().get_device(id).await?;
        self.inner.store.devices.upsert(device);
        self.inner
            .store
            .devices
            .get(id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: Device::KIND.into(),
                identifier: id.to_string(),
            })
    }

    pub async fn list_devices(&self, scope: Option<&EntityId>) -> Result<Vec<Arc<Device>>, CoreError> {
        let result = self.fetch_devices(scope).await;
        self.read(result)
    }

    pub async fn get_device(&self, id: &EntityId) -> Result<Arc<Device>, CoreError> {
        let result = self.fetch_device(id).await;
        self.read(result)
    }

    pub async fn device_metrics(&self, id: &EntityId) -> Result<Vec<MetricSample>, CoreError> {
        let result = self.client().device_metrics(id).await.map_err(Into::into);
        self.read(result)
    }

    pub async fn command_history(&self, id: &EntityId) -> Result<Vec<MdmCommand>, CoreError> {
        let result = self.client().command_history(id).await.map_err(Into::into);
        self.read(result)
    }

    pub async fn mdm_stats(&self) -> Result<MdmStats, CoreError> {
        let result = self.client().mdm_stats().await.map_err(Into::into);
        self.read(result)
    }

    fn device_label(&self, id: &EntityId) -> String {
        self.inner
            .store
            .devices
            .get(id)
            .map_or_else(|| id.to_string(), |d| d.label())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub async fn enroll_device(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.client().enroll_device(id).await.map_err(Into::into);
        self.finish(result, |()| {
            format!("Enrollment started for {}", self.device_label(id))
        })
    }

    pub async fn restart_device(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.client().restart_device(id).await.map_err(Into::into);
        self.finish(result, |()| format!("Restart sent to {}", self.device_label(id)))
    }

    pub async fn disable_kiosk(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.client().disable_kiosk(id).await.map_err(Into::into);
        self.finish(result, |()| {
            format!("Kiosk mode disabled on {}", self.device_label(id))
        })
    }

    /// Validate the builder's selection and send it: a preset id or a
    /// custom allow-list, never both.
    pub async fn apply_kiosk(
        &self,
        id: &EntityId,
        config: KioskConfigBuilder,
    ) -> Result<KioskSubmission, CoreError> {
        let result: Result<KioskSubmission, CoreError> = async {
            let submission = config.build()?;
            debug!(%id, ?submission, "applying kiosk configuration");
            match &submission {
                KioskSubmission::Preset { preset_id } => {
                    self.client().apply_kiosk_preset(id, preset_id).await?;
                }
                KioskSubmission::Custom(request) => {
                    self.client().enable_kiosk(id, request).await?;
                }
            }
            Ok(submission)
        }
        .await;

        self.finish(result, |submission| match submission {
            KioskSubmission::Preset { preset_id } => format!(
                "Kiosk preset {preset_id} applied to {}",
                self.device_label(id)
            ),
            KioskSubmission::Custom(request) => format!(
                "Kiosk mode enabled on {} with {} app(s)",
                self.device_label(id),
                request.allowed_apps.len()
            ),
        })
    }

    pub async fn send_test_notification(
        &self,
        id: &EntityId,
        title: &str,
        message: &str,
    ) -> Result<(), CoreError> {
        let result = self
            .client()
            .send_notification(id, title, message)
            .await
            .map_err(Into::into);
        self.finish(result, |()| {
            format!("Notification sent to {}", self.device_label(id))
        })
    }

    pub async fn apply_profile(&self, id: &EntityId, profile_id: &EntityId) -> Result<(), CoreError> {
        let result = self
            .client()
            .apply_profile(id, profile_id)
            .await
            .map_err(Into::into);
        self.finish(result, |()| {
            format!("Profile {profile_id} applied to {}", self.device_label(id))
        })
    }

    /// Generic queued command. Returns the server's command row if echoed.
    pub async fn send_command(
        &self,
        id: &EntityId,
        request: &CommandRequest,
    ) -> Result<Option<MdmCommand>, CoreError> {
        let result = self.client().send_command(id, request).await.map_err(Into::into);
        self.finish(result, |_| {
            format!(
                "Command {} queued for {}",
                request.command_type,
                self.device_label(id)
            )
        })
    }

    // ── Catalogues ───────────────────────────────────────────────────

    pub async fn kiosk_presets(&self) -> Result<Vec<KioskPreset>, CoreError> {
        let result = self.client().list_kiosk_presets().await.map_err(Into::into);
        self.read(result)
    }

    pub async fn profiles(&self) -> Result<Vec<ConfigurationProfile>, CoreError> {
        let result = self.client().list_profiles().await.map_err(Into::into);
        self.read(result)
    }

    // ── Alerts ───────────────────────────────────────────────────────

    /// Alerts in server order.
    pub async fn list_alerts(&self) -> Result<Vec<Arc<MdmAlert>>, CoreError> {
        let client = self.client();
        let result = Self::refresh(&self.inner.store.alerts, None, client.list_alerts()).await;
        self.read(result)
    }

    /// Mark one alert resolved, optimistically.
    pub async fn resolve_alert(&self, id: &EntityId) -> Result<(), CoreError> {
        let alerts = &self.inner.store.alerts;
        let op = OperationId::new();
        let label = alerts
            .apply_optimistic(op, id, |a| a.resolved = true)
            .map_or_else(|| id.to_string(), |a| a.label());
        let outcome = self.client().resolve_alert(id).await;
        let result = Self::settle(alerts, op, outcome, |()| None);
        self.finish(result, |()| format!("Alert {label} resolved"))
    }
}
