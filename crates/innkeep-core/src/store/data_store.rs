// ── Central reactive data store ──
//
// One collection per entity type. Fetches write through here, socket
// events invalidate entries here, and every view subscribes here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{
    Activity, BackgroundImage, Device, DiningPlace, EntityId, Guest, MdmAlert, Property,
    PropertyInfoItem, StreamingService,
};
use crate::stream::EntityStream;

/// Central reactive store for all console entities.
///
/// Thread-safe and lock-free: reads are wait-free, writes use fine-grained
/// per-shard locks within `DashMap`. Mutations are broadcast to
/// subscribers via `watch` channels.
pub struct DataStore {
    pub(crate) properties: EntityCollection<Property>,
    pub(crate) guests: EntityCollection<Guest>,
    pub(crate) activities: EntityCollection<Activity>,
    pub(crate) dining: EntityCollection<DiningPlace>,
    pub(crate) streaming: EntityCollection<StreamingService>,
    pub(crate) backgrounds: EntityCollection<BackgroundImage>,
    pub(crate) property_info: EntityCollection<PropertyInfoItem>,
    pub(crate) devices: EntityCollection<Device>,
    pub(crate) alerts: EntityCollection<MdmAlert>,
    pub(crate) last_device_poll: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) last_realtime_event: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_device_poll, _) = watch::channel(None);
        let (last_realtime_event, _) = watch::channel(None);

        Self {
            properties: EntityCollection::new(),
            guests: EntityCollection::new(),
            activities: EntityCollection::new(),
            dining: EntityCollection::new(),
            streaming: EntityCollection::new(),
            backgrounds: EntityCollection::new(),
            property_info: EntityCollection::new(),
            devices: EntityCollection::new(),
            alerts: EntityCollection::new(),
            last_device_poll,
            last_realtime_event,
        }
    }

    // ── Collections ──────────────────────────────────────────────────

    pub fn properties(&self) -> &EntityCollection<Property> {
        &self.properties
    }

    pub fn guests(&self) -> &EntityCollection<Guest> {
        &self.guests
    }

    pub fn activities(&self) -> &EntityCollection<Activity> {
        &self.activities
    }

    pub fn dining(&self) -> &EntityCollection<DiningPlace> {
        &self.dining
    }

    pub fn streaming(&self) -> &EntityCollection<StreamingService> {
        &self.streaming
    }

    pub fn backgrounds(&self) -> &EntityCollection<BackgroundImage> {
        &self.backgrounds
    }

    pub fn property_info(&self) -> &EntityCollection<PropertyInfoItem> {
        &self.property_info
    }

    pub fn devices(&self) -> &EntityCollection<Device> {
        &self.devices
    }

    pub fn alerts(&self) -> &EntityCollection<MdmAlert> {
        &self.alerts
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn guest_by_id(&self, id: &EntityId) -> Option<Arc<Guest>> {
        self.guests.get(id)
    }

    pub fn device_by_id(&self, id: &EntityId) -> Option<Arc<Device>> {
        self.devices.get(id)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_guests(&self) -> EntityStream<Guest> {
        EntityStream::new(self.guests.subscribe())
    }

    pub fn subscribe_activities(&self) -> EntityStream<Activity> {
        EntityStream::new(self.activities.subscribe())
    }

    pub fn subscribe_streaming(&self) -> EntityStream<StreamingService> {
        EntityStream::new(self.streaming.subscribe())
    }

    pub fn subscribe_property_info(&self) -> EntityStream<PropertyInfoItem> {
        EntityStream::new(self.property_info.subscribe())
    }

    pub fn subscribe_devices(&self) -> EntityStream<Device> {
        EntityStream::new(self.devices.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_device_poll(&self) -> Option<DateTime<Utc>> {
        *self.last_device_poll.borrow()
    }

    pub fn last_realtime_event(&self) -> Option<DateTime<Utc>> {
        *self.last_realtime_event.borrow()
    }

    /// How long ago the device list was last polled, or `None` if never.
    pub fn device_data_age(&self) -> Option<chrono::Duration> {
        self.last_device_poll().map(|t| Utc::now() - t)
    }

    pub(crate) fn touch_device_poll(&self) {
        self.last_device_poll.send_replace(Some(Utc::now()));
    }

    pub(crate) fn touch_realtime_event(&self) {
        self.last_realtime_event.send_replace(Some(Utc::now()));
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
