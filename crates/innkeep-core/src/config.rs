// ── Runtime console configuration ──
//
// Describes *where* the backend lives and how the console behaves once
// connected. Never touches disk: the CLI resolves profiles and env vars
// and hands a finished `ConsoleConfig` in.

use std::time::Duration;

use innkeep_api::models::EntityId;
use innkeep_api::{ReconnectConfig, TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// REST base, e.g. `https://api.innkeep.app`.
    pub api_url: Url,
    /// Realtime endpoint. Falls back to `api_url` when unset.
    pub ws_url: Option<Url>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Open the realtime relay on connect.
    pub realtime_enabled: bool,
    pub reconnect: ReconnectConfig,
    /// Device list refresh period. Zero disables polling.
    pub device_poll_interval: Duration,
    /// Property scope for lists and the realtime room.
    pub property: Option<EntityId>,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            ws_url: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            realtime_enabled: true,
            reconnect: ReconnectConfig::default(),
            device_poll_interval: Duration::from_secs(30),
            property: None,
        }
    }

    pub fn realtime_url(&self) -> &Url {
        self.ws_url.as_ref().unwrap_or(&self.api_url)
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
