// innkeep-api: Async Rust client for the Innkeep REST API and realtime relay

pub mod error;
pub mod models;
pub mod realtime;
pub mod rest;
pub mod transport;

pub use error::Error;
pub use realtime::{ConnectionStatus, RealtimeConfig, RealtimeEvent, RealtimeHandle, ReconnectConfig};
pub use rest::{ApiClient, ImageUpload};
pub use transport::{TlsMode, TransportConfig};
