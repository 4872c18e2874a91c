// Wire types shared by the REST client and the realtime channel.

mod de;

pub mod content;
pub mod entity_id;
pub mod guest;
pub mod images;
pub mod mdm;
pub mod property;

pub use content::{
    Activity, ActivityInput, ActivityType, BackgroundImage, DiningInput, DiningPlace, InfoCategory,
    OrderEntry, Ordered, PropertyInfoInput, PropertyInfoItem, StreamingInput, StreamingService,
    Toggleable,
};
pub use entity_id::EntityId;
pub use guest::{Guest, GuestInput, GuestStatus, GuestType};
pub use images::{ImageCheck, ImageSearchResult, StoredImage};
pub use mdm::{
    CommandPriority, CommandRequest, CommandStatus, ConfigurationProfile, Device, DeviceStatus,
    EnrollmentStatus, KioskEnableRequest, KioskModeConfig, KioskPreset, MdmAlert, MdmCommand,
    MdmStats, MetricSample, ReturnTimeout, Telemetry,
};
pub use property::{DashboardStats, LoginData, Property, PropertyInput, Settings, User};
