// Typed server → client events.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{DeviceStatus, EntityId, Guest};

pub const GUEST_CHECKED_IN: &str = "guest.checked_in";
pub const GUEST_CHECKED_OUT: &str = "guest.checked_out";
pub const GUEST_AUTO_CHECKOUT: &str = "guest.auto_checkout";
pub const GUEST_DELETED: &str = "guest.deleted";
pub const SESSIONS_CLEARED: &str = "sessions.cleared";
pub const CLEANUP_COMPLETED: &str = "cleanup.completed";
pub const DEVICE_STATUS_CHANGED: &str = "device.status_changed";

/// One named event from the realtime channel.
///
/// Payloads that do not match the expected shape degrade to
/// [`RealtimeEvent::Other`] so the name is never lost.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    GuestCheckedIn(Guest),
    GuestCheckedOut(Guest),
    GuestAutoCheckout(Guest),
    GuestDeleted {
        id: Option<EntityId>,
        name: Option<String>,
    },
    SessionsCleared {
        property_id: Option<EntityId>,
        count: Option<u64>,
    },
    CleanupCompleted {
        property_id: Option<EntityId>,
        removed: Option<u64>,
    },
    DeviceStatusChanged {
        device_id: EntityId,
        status: DeviceStatus,
        device_name: Option<String>,
    },
    Other {
        name: String,
        payload: Value,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GuestPayload {
    Wrapped { guest: Guest },
    Bare(Guest),
}

#[derive(Deserialize)]
struct GuestDeletedPayload {
    #[serde(default, alias = "guestId", alias = "guest_id")]
    id: Option<EntityId>,
    #[serde(default, alias = "guestName", alias = "guest_name")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ScopeCountPayload {
    #[serde(default, alias = "propertyId")]
    property_id: Option<EntityId>,
    #[serde(default, alias = "count", alias = "cleared", alias = "removed")]
    affected: Option<u64>,
}

#[derive(Deserialize)]
struct DeviceStatusPayload {
    #[serde(alias = "deviceId", alias = "id")]
    device_id: EntityId,
    #[serde(default, alias = "device_status")]
    status: DeviceStatus,
    #[serde(default, alias = "deviceName")]
    device_name: Option<String>,
}

impl RealtimeEvent {
    /// Build a typed event from the wire name and payload.
    pub fn from_wire(name: &str, payload: Value) -> Self {
        let typed = match name {
            GUEST_CHECKED_IN | GUEST_CHECKED_OUT | GUEST_AUTO_CHECKOUT => {
                serde_json::from_value::<GuestPayload>(payload.clone())
                    .ok()
                    .map(|p| {
                        let guest = match p {
                            GuestPayload::Wrapped { guest } | GuestPayload::Bare(guest) => guest,
                        };
                        match name {
                            GUEST_CHECKED_IN => Self::GuestCheckedIn(guest),
                            GUEST_CHECKED_OUT => Self::GuestCheckedOut(guest),
                            _ => Self::GuestAutoCheckout(guest),
                        }
                    })
            }
            GUEST_DELETED => serde_json::from_value::<GuestDeletedPayload>(payload.clone())
                .ok()
                .map(|p| Self::GuestDeleted {
                    id: p.id,
                    name: p.name,
                }),
            SESSIONS_CLEARED => scope_count(&payload).map(|p| Self::SessionsCleared {
                property_id: p.property_id,
                count: p.affected,
            }),
            CLEANUP_COMPLETED => scope_count(&payload).map(|p| Self::CleanupCompleted {
                property_id: p.property_id,
                removed: p.affected,
            }),
            DEVICE_STATUS_CHANGED => {
                serde_json::from_value::<DeviceStatusPayload>(payload.clone())
                    .ok()
                    .map(|p| Self::DeviceStatusChanged {
                        device_id: p.device_id,
                        status: p.status,
                        device_name: p.device_name,
                    })
            }
            _ => None,
        };

        typed.unwrap_or_else(|| {
            if is_known(name) {
                tracing::debug!(event = name, "unexpected payload shape");
            }
            Self::Other {
                name: name.to_owned(),
                payload,
            }
        })
    }

    /// The wire name this event arrived under.
    pub fn name(&self) -> &str {
        match self {
            Self::GuestCheckedIn(_) => GUEST_CHECKED_IN,
            Self::GuestCheckedOut(_) => GUEST_CHECKED_OUT,
            Self::GuestAutoCheckout(_) => GUEST_AUTO_CHECKOUT,
            Self::GuestDeleted { .. } => GUEST_DELETED,
            Self::SessionsCleared { .. } => SESSIONS_CLEARED,
            Self::CleanupCompleted { .. } => CLEANUP_COMPLETED,
            Self::DeviceStatusChanged { .. } => DEVICE_STATUS_CHANGED,
            Self::Other { name, .. } => name,
        }
    }
}

fn scope_count(payload: &Value) -> Option<ScopeCountPayload> {
    if payload.is_null() {
        return Some(ScopeCountPayload {
            property_id: None,
            affected: None,
        });
    }
    serde_json::from_value(payload.clone()).ok()
}

fn is_known(name: &str) -> bool {
    matches!(
        name,
        GUEST_CHECKED_IN
            | GUEST_CHECKED_OUT
            | GUEST_AUTO_CHECKOUT
            | GUEST_DELETED
            | SESSIONS_CLEARED
            | CLEANUP_COMPLETED
            | DEVICE_STATUS_CHANGED
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn guest_event_accepts_wrapped_payload() {
        let event = RealtimeEvent::from_wire(
            GUEST_CHECKED_IN,
            json!({ "guest": { "id": 3, "first_name": "Ada" } }),
        );
        let RealtimeEvent::GuestCheckedIn(guest) = event else {
            panic!("expected GuestCheckedIn, got {event:?}");
        };
        assert_eq!(guest.id, EntityId::Numeric(3));
    }

    #[test]
    fn device_status_uses_camel_case_id() {
        let event = RealtimeEvent::from_wire(
            DEVICE_STATUS_CHANGED,
            json!({ "deviceId": "atv-7", "status": "online" }),
        );
        assert_eq!(
            event,
            RealtimeEvent::DeviceStatusChanged {
                device_id: EntityId::Text("atv-7".into()),
                status: DeviceStatus::Online,
                device_name: None,
            }
        );
    }

    #[test]
    fn malformed_known_event_keeps_its_name() {
        let event = RealtimeEvent::from_wire(GUEST_CHECKED_OUT, json!("garbage"));
        assert_eq!(event.name(), GUEST_CHECKED_OUT);
        assert!(matches!(event, RealtimeEvent::Other { .. }));
    }

    #[test]
    fn sessions_cleared_without_payload() {
        let event = RealtimeEvent::from_wire(SESSIONS_CLEARED, Value::Null);
        assert_eq!(
            event,
            RealtimeEvent::SessionsCleared {
                property_id: None,
                count: None
            }
        );
    }
}
