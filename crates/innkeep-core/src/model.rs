// ── Domain model ──
//
// The wire types from innkeep-api are the domain types; this module adds
// the `Entity` view the store needs on top of them.

pub use innkeep_api::models::*;

/// Anything the `DataStore` can hold.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable kind for messages ("Guest", "Activity", ...).
    const KIND: &'static str;

    fn entity_id(&self) -> &EntityId;

    /// The owning property, used to replace one scope on refresh.
    fn scope(&self) -> Option<&EntityId>;

    /// Short label for notifications.
    fn label(&self) -> String;
}

macro_rules! scoped_entity {
    ($ty:ty, $kind:literal, |$it:ident| $label:expr) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn entity_id(&self) -> &EntityId {
                &self.id
            }

            fn scope(&self) -> Option<&EntityId> {
                self.property_id.as_ref()
            }

            fn label(&self) -> String {
                let $it = self;
                $label
            }
        }
    };
}

scoped_entity!(Guest, "Guest", |g| g.display_name());
scoped_entity!(Activity, "Activity", |a| a.title.clone());
scoped_entity!(DiningPlace, "Dining place", |d| d.display_name().to_owned());
scoped_entity!(StreamingService, "Streaming service", |s| s.service_name.clone());
scoped_entity!(PropertyInfoItem, "Property information", |i| i.title.clone());
scoped_entity!(Device, "Device", |d| d.display_name());
scoped_entity!(BackgroundImage, "Background image", |b| b
    .filename
    .clone()
    .unwrap_or_else(|| b.id.to_string()));

impl Entity for Property {
    const KIND: &'static str = "Property";

    fn entity_id(&self) -> &EntityId {
        &self.id
    }

    fn scope(&self) -> Option<&EntityId> {
        None
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Entity for MdmAlert {
    const KIND: &'static str = "Alert";

    fn entity_id(&self) -> &EntityId {
        &self.id
    }

    fn scope(&self) -> Option<&EntityId> {
        None
    }

    fn label(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.id.to_string())
    }
}
