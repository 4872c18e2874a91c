//! Reactive data layer between `innkeep-api` and the `innkeep` CLI.
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the innkeep workspace:
//!
//! - **[`Console`]**: Central facade for one operator session:
//!   [`authenticate()`](Console::authenticate) gates on the stored session,
//!   [`connect()`](Console::connect) starts the realtime relay and device
//!   polling, and every resource operation reports its outcome through
//!   [`notifications()`](Console::notifications).
//!   [`Console::oneshot()`](Console::oneshot) is the lightweight mode for
//!   single CLI invocations.
//!
//! - **[`DataStore`]**: Lock-free reactive storage built on
//!   `EntityCollection<T>` (`DashMap` + `tokio::sync::watch` channels).
//!   Optimistic edits are tracked per [`OperationId`] and rolled back
//!   precisely on failure.
//!
//! - **[`EntityStream<T>`]**: Subscription handle vended by the `DataStore`.
//!
//! - **View-models**: [`listing`] filters and sorts, [`ordering`] renumbers
//!   after a move, [`image`] resolves the single active image source, and
//!   [`kiosk`] validates kiosk selections.

pub mod coerce;
pub mod config;
pub mod console;
pub mod error;
pub mod image;
pub mod kiosk;
pub mod listing;
pub mod model;
pub mod notify;
pub mod ordering;
pub mod presets;
pub mod relay;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{Console, Move};
pub use error::CoreError;
pub use image::{ImageForm, ImageMode, ImageSource, ProxiedImage};
pub use kiosk::{KioskConfigBuilder, KioskSubmission};
pub use listing::{
    ActivityFilter, DeviceFilter, DiningFilter, Filter, GuestFilter, GuestSort, InfoFilter,
};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use ordering::{Direction, Reorder};
pub use session::{AuthState, MemorySessionStore, Session, SessionStore};
pub use store::{DataStore, EntityCollection, OperationId};
pub use stream::EntityStream;

// Re-export the common model types at the crate root.
pub use model::{
    Activity, BackgroundImage, Device, DeviceStatus, DiningPlace, EnrollmentStatus, Entity,
    EntityId, Guest, GuestStatus, GuestType, MdmAlert, Property, PropertyInfoItem, ReturnTimeout,
    StreamingService, User,
};
