// ── MDM: devices, commands, alerts, profiles, kiosk presets ──
//
// The MDM endpoints mix naming conventions: device rows are snake_case,
// kiosk configuration and command requests are camelCase. Each type
// declares the casing the backend actually uses.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::de;
use super::entity_id::EntityId;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnrollmentStatus {
    #[default]
    NotEnrolled,
    Pending,
    Enrolled,
    #[serde(other)]
    Unknown,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeviceStatus {
    Online,
    #[default]
    Offline,
    #[serde(other)]
    Unknown,
}

/// How long a guest may stay in a launched app before the kiosk returns
/// to the home screen. Serialized as seconds, `0` meaning never.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ReturnTimeout {
    #[default]
    #[strum(to_string = "never")]
    Never,
    #[strum(to_string = "5m")]
    Minutes5,
    #[strum(to_string = "15m")]
    Minutes15,
    #[strum(to_string = "30m")]
    Minutes30,
    #[strum(to_string = "1h")]
    Hours1,
}

impl ReturnTimeout {
    pub fn as_secs(self) -> u32 {
        match self {
            Self::Never => 0,
            Self::Minutes5 => 300,
            Self::Minutes15 => 900,
            Self::Minutes30 => 1800,
            Self::Hours1 => 3600,
        }
    }

    /// Maps a server value back to the nearest named option.
    pub fn from_secs(secs: u32) -> Self {
        match secs {
            0 => Self::Never,
            1..=300 => Self::Minutes5,
            301..=900 => Self::Minutes15,
            901..=1800 => Self::Minutes30,
            _ => Self::Hours1,
        }
    }
}

impl Serialize for ReturnTimeout {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_secs())
    }
}

impl<'de> Deserialize<'de> for ReturnTimeout {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(de::lenient_u32(deserializer)?.map_or(Self::Never, Self::from_secs))
    }
}

/// Kiosk lockdown policy as stored on the device row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskModeConfig {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub allowed_apps: Vec<String>,
    #[serde(default)]
    pub return_timeout: ReturnTimeout,
}

/// Last reported device health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub cpu_usage: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub storage_total: Option<u64>,
    #[serde(default)]
    pub storage_used: Option<u64>,
    #[serde(default)]
    pub wifi_signal: Option<i32>,
}

impl Telemetry {
    #[allow(clippy::cast_precision_loss)]
    pub fn storage_percent(&self) -> Option<f64> {
        match (self.storage_used, self.storage_total) {
            (Some(used), Some(total)) if total > 0 => Some(used as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}

/// An Apple TV (or other managed device) installed in a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub enrollment_status: EnrollmentStatus,
    #[serde(default, deserialize_with = "de::nullable")]
    pub supervised: bool,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub provisional_days_left: Option<u32>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub kiosk_mode_enabled: bool,
    #[serde(default)]
    pub kiosk_mode_config: Option<KioskModeConfig>,
    #[serde(default, alias = "status", deserialize_with = "de::nullable")]
    pub device_status: DeviceStatus,
    #[serde(flatten)]
    pub telemetry: Telemetry,
    #[serde(default)]
    pub last_seen: Option<String>,
}

impl Device {
    pub fn display_name(&self) -> String {
        self.device_name
            .clone()
            .or_else(|| self.serial_number.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    pub fn is_online(&self) -> bool {
        self.device_status == DeviceStatus::Online
    }
}

// ── Commands ────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandStatus {
    #[default]
    Pending,
    Sent,
    Acknowledged,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// A queued or historical remote command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdmCommand {
    pub id: EntityId,
    #[serde(default)]
    pub device_id: Option<EntityId>,
    #[serde(alias = "commandType")]
    pub command_type: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub status: CommandStatus,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "duration")]
    pub duration_ms: Option<u64>,
}

/// Body of `POST /api/mdm/devices/:id/commands`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub command_type: String,
    pub payload: serde_json::Value,
    pub priority: CommandPriority,
}

/// Body of `POST /api/mdm/devices/:id/kiosk/enable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskEnableRequest {
    pub mode: String,
    pub allowed_apps: Vec<String>,
    pub return_timeout: ReturnTimeout,
}

// ── Alerts, profiles, presets, stats ────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdmAlert {
    pub id: EntityId,
    #[serde(default)]
    pub device_id: Option<EntityId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub resolved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationProfile {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub profile_type: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskPreset {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "allowedApps", deserialize_with = "de::string_list")]
    pub allowed_apps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmStats {
    #[serde(default, deserialize_with = "de::nullable")]
    pub total_devices: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub online_devices: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub offline_devices: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub enrolled_devices: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub kiosk_devices: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub pending_commands: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub unresolved_alerts: u64,
}

/// One telemetry sample from `GET /api/mdm/devices/:id/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    #[serde(alias = "timestamp", alias = "recorded_at")]
    pub at: String,
    #[serde(flatten)]
    pub telemetry: Telemetry,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_with_flattened_telemetry() {
        let d: Device = serde_json::from_value(serde_json::json!({
            "id": "atv-1",
            "device_name": "Living room",
            "enrollment_status": "enrolled",
            "supervised": true,
            "kiosk_mode_enabled": true,
            "kiosk_mode_config": {
                "mode": "custom",
                "allowedApps": "com.netflix.Netflix, com.disney.disneyplus",
                "returnTimeout": 900
            },
            "device_status": "online",
            "battery_level": null,
            "storage_total": 64,
            "storage_used": 16
        }))
        .unwrap();

        assert!(d.is_online());
        assert_eq!(d.enrollment_status, EnrollmentStatus::Enrolled);
        let kiosk = d.kiosk_mode_config.unwrap();
        assert_eq!(kiosk.allowed_apps.len(), 2);
        assert_eq!(kiosk.return_timeout, ReturnTimeout::Minutes15);
        assert_eq!(d.telemetry.storage_percent(), Some(25.0));
    }

    #[test]
    fn command_request_is_camel_case() {
        let req = CommandRequest {
            command_type: "restart".into(),
            payload: serde_json::json!({}),
            priority: CommandPriority::High,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "commandType": "restart", "payload": {}, "priority": "high" })
        );
    }

    #[test]
    fn return_timeout_text_and_seconds() {
        assert_eq!("15m".parse::<ReturnTimeout>().unwrap(), ReturnTimeout::Minutes15);
        assert_eq!(ReturnTimeout::Hours1.as_secs(), 3600);
        assert_eq!(ReturnTimeout::from_secs(0), ReturnTimeout::Never);
        assert_eq!(ReturnTimeout::Minutes30.to_string(), "30m");
    }
}
