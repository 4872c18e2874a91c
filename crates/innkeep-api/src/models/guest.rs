// ── Guest domain types ──

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::de;
use super::entity_id::EntityId;

/// Lifecycle state. Transitions are driven server-side; the console only
/// ever sets it explicitly through `PATCH /api/guests/:id/status`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GuestStatus {
    #[default]
    Reserved,
    CheckedIn,
    CheckoutDue,
    CheckedOut,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GuestType {
    Family,
    Couple,
    Solo,
    Business,
    Group,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub check_in_date: Option<String>,
    #[serde(default)]
    pub check_out_date: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub party_size: Option<u32>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub guest_type: GuestType,
    #[serde(default, deserialize_with = "de::nullable")]
    pub guest_labels: BTreeSet<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub status: GuestStatus,

    // Profile
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub adults: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub children: Option<u32>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub preferred_activities: Vec<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl Guest {
    /// Display name: explicit `name`, else `first last`, else the email.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_owned();
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            joined
        }
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in_date.as_deref().and_then(parse_day)
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out_date.as_deref().and_then(parse_day)
    }
}

/// Accepts both `2024-06-01` and full ISO timestamps.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Create / update payload for a guest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_type: Option<GuestType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adults: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_activities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
