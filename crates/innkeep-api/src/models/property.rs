// ── Properties, users, settings, dashboard ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::de;
use super::entity_id::EntityId;

/// A rental unit / house. Nearly every other entity is scoped by `property_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub wifi_ssid: Option<String>,
    #[serde(default)]
    pub wifi_password: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
}

/// Create / update payload for a property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
}

/// The logged-in staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "username")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// `data` of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

/// `data` of `GET /api/auth/verify`. Some deployments return the user
/// directly, others wrap it in `{ user }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum VerifyData {
    Wrapped { user: User },
    Bare(User),
}

impl VerifyData {
    pub(crate) fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// Free-form console settings, stored server-side as a key/value map.
pub type Settings = BTreeMap<String, serde_json::Value>;

/// Aggregate counters for the dashboard landing view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "de::nullable")]
    pub total_properties: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub total_guests: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub checked_in: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub arrivals_today: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub departures_today: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub active_activities: u64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub devices_online: u64,
}
