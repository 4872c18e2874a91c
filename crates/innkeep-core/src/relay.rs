// ── Realtime event dispatch ──
//
// Fixed table from relay event to notification, plus the store
// invalidation each event implies. The console's bridge task runs both
// and then performs any follow-up fetch.

use innkeep_api::RealtimeEvent;
use tracing::{debug, info};

use crate::model::{Entity, EntityId};
use crate::notify::NotificationLevel;
use crate::store::DataStore;

/// Follow-up work an event asks for after the store was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEffect {
    Nothing,
    /// Guest list for this property (or the joined one) is stale.
    RefetchGuests(Option<EntityId>),
    /// One device changed; fetch its full row.
    RefetchDevice(EntityId),
}

/// Notification text for an event. `None` for events with no toast.
pub fn describe(event: &RealtimeEvent) -> Option<(NotificationLevel, String)> {
    let described = match event {
        RealtimeEvent::GuestCheckedIn(guest) => (
            NotificationLevel::Success,
            format!("{} checked in", guest.label()),
        ),
        RealtimeEvent::GuestCheckedOut(guest) => (
            NotificationLevel::Info,
            format!("{} checked out", guest.label()),
        ),
        RealtimeEvent::GuestAutoCheckout(guest) => (
            NotificationLevel::Info,
            format!("{} was checked out automatically", guest.label()),
        ),
        RealtimeEvent::GuestDeleted { id, name } => {
            let who = name
                .clone()
                .or_else(|| id.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".into());
            (NotificationLevel::Info, format!("Guest {who} deleted"))
        }
        RealtimeEvent::SessionsCleared { count, .. } => (
            NotificationLevel::Info,
            match count {
                Some(n) => format!("{n} guest sessions cleared"),
                None => "Guest sessions cleared".into(),
            },
        ),
        RealtimeEvent::CleanupCompleted { removed, .. } => (
            NotificationLevel::Info,
            match removed {
                Some(n) => format!("Cleanup completed, {n} records removed"),
                None => "Cleanup completed".into(),
            },
        ),
        RealtimeEvent::DeviceStatusChanged {
            device_id,
            status,
            device_name,
        } => {
            let name = device_name.clone().unwrap_or_else(|| device_id.to_string());
            (NotificationLevel::Info, format!("Device {name} is now {status}"))
        }
        RealtimeEvent::Other { name, .. } => {
            debug!(event = %name, "unhandled realtime event");
            return None;
        }
    };
    Some(described)
}

/// Apply an event's direct effect on the store and report what still has
/// to be fetched.
pub fn apply(store: &DataStore, event: &RealtimeEvent) -> RelayEffect {
    store.touch_realtime_event();
    info!(event = event.name(), "realtime event");

    match event {
        RealtimeEvent::GuestCheckedIn(guest)
        | RealtimeEvent::GuestCheckedOut(guest)
        | RealtimeEvent::GuestAutoCheckout(guest) => {
            store.guests.upsert(guest.clone());
            RelayEffect::Nothing
        }
        RealtimeEvent::GuestDeleted { id: Some(id), .. } => {
            store.guests.remove(id);
            RelayEffect::Nothing
        }
        RealtimeEvent::GuestDeleted { id: None, .. } => {
            store.guests.mark_stale();
            RelayEffect::RefetchGuests(None)
        }
        RealtimeEvent::SessionsCleared { property_id, .. }
        | RealtimeEvent::CleanupCompleted { property_id, .. } => {
            store.guests.mark_stale();
            RelayEffect::RefetchGuests(property_id.clone())
        }
        RealtimeEvent::DeviceStatusChanged {
            device_id, status, ..
        } => {
            let status = *status;
            store
                .devices
                .patch(device_id, |d| d.device_status = status);
            RelayEffect::RefetchDevice(device_id.clone())
        }
        RealtimeEvent::Other { .. } => RelayEffect::Nothing,
    }
}
