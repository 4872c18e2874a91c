//! Shared configuration for the innkeep CLI.
//!
//! TOML profiles, backend URL and token resolution (flag, env, profile,
//! build-time default), session persistence in the system keyring, and
//! translation to `innkeep_core::ConsoleConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

mod session;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use innkeep_core::{ConsoleConfig, EntityId, TlsVerification};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use url::Url;

pub use session::{KeyringSessionStore, SessionFile, session_path};

pub const API_URL_ENV: &str = "INNKEEP_API_URL";
pub const WS_URL_ENV: &str = "INNKEEP_WS_URL";
pub const TOKEN_ENV: &str = "INNKEEP_TOKEN";

/// Endpoints baked in at build time, if any.
const BUILD_API_URL: Option<&str> = option_env!("INNKEEP_API_URL");
const BUILD_WS_URL: Option<&str> = option_env!("INNKEEP_WS_URL");

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("session file is corrupt: {0}")]
    Session(#[from] serde_json::Error),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for innkeep_core::CoreError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The profile name to use: explicit, then `default_profile`, then
    /// `"default"`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between device list refreshes in `watch`. 0 disables.
    #[serde(default = "default_device_poll")]
    pub device_poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            device_poll_interval: default_device_poll(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_device_poll() -> u64 {
    30
}

/// Which hosted backend a profile talks to when no URL is set.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn api_fallback(self) -> &'static str {
        match self {
            Self::Production => "https://api.innkeep.app",
            Self::Development => "http://localhost:3001",
        }
    }

    pub fn ws_fallback(self) -> &'static str {
        match self {
            Self::Production => "wss://api.innkeep.app",
            Self::Development => "ws://localhost:3001",
        }
    }
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default)]
    pub environment: Environment,

    /// REST base URL; falls back to the environment's host.
    pub api_url: Option<String>,

    /// Realtime URL; derived from `api_url` when unset.
    pub ws_url: Option<String>,

    /// Login email, used as the `login` prompt default.
    pub email: Option<String>,

    /// Bearer token (plaintext -- prefer the keyring via `login`).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Property that lists and the realtime room are scoped to.
    pub default_property: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid certificates (self-signed staging hosts).
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("app", "innkeep", "innkeep")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for cached session data.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("innkeep");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path`, then `INNKEEP_`-prefixed env. Nested keys use a
/// double underscore: `INNKEEP_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("INNKEEP_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file doesn't exist or is bad.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// First non-empty candidate, else `fallback`.
fn pick<'a>(candidates: &[Option<&'a str>], fallback: Option<&'a str>) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .or(fallback)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL {raw:?}: {e}"),
    })
}

/// REST base: flag, `INNKEEP_API_URL`, profile, build-time value, then
/// the environment's hosted default.
pub fn resolve_api_url(flag: Option<&str>, profile: Option<&Profile>) -> Result<Url, ConfigError> {
    let env = std::env::var(API_URL_ENV).ok();
    let environment = profile.map(|p| p.environment).unwrap_or_default();
    let raw = pick(
        &[
            flag,
            env.as_deref(),
            profile.and_then(|p| p.api_url.as_deref()),
            BUILD_API_URL,
        ],
        None,
    )
    .unwrap_or_else(|| environment.api_fallback());
    parse_url("api_url", raw)
}

/// Realtime URL from the explicit sources only. `None` lets the console
/// derive it from the REST base, so a custom `api_url` keeps its host.
pub fn resolve_ws_url(
    flag: Option<&str>,
    profile: Option<&Profile>,
) -> Result<Option<Url>, ConfigError> {
    let env = std::env::var(WS_URL_ENV).ok();
    pick(
        &[
            flag,
            env.as_deref(),
            profile.and_then(|p| p.ws_url.as_deref()),
            BUILD_WS_URL,
        ],
        None,
    )
    .map(|raw| parse_url("ws_url", raw))
    .transpose()
}

/// A token supplied outside the keyring: the profile's `token_env`
/// variable, `INNKEEP_TOKEN`, or plaintext in the profile.
pub fn resolve_token(profile: Option<&Profile>) -> Option<SecretString> {
    let from_named_env = profile
        .and_then(|p| p.token_env.as_deref())
        .and_then(|name| std::env::var(name).ok());
    let from_env = std::env::var(TOKEN_ENV).ok();
    pick(
        &[
            from_named_env.as_deref(),
            from_env.as_deref(),
            profile.and_then(|p| p.token.as_deref()),
        ],
        None,
    )
    .map(|t| SecretString::from(t.to_owned()))
}

/// Per-invocation overrides layered over a profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub ws_url: Option<String>,
    pub property: Option<String>,
    pub timeout: Option<u64>,
}

/// Build a `ConsoleConfig` from defaults, an optional profile and
/// overrides.
pub fn build_console_config(
    defaults: &Defaults,
    profile: Option<&Profile>,
    overrides: &Overrides,
) -> Result<ConsoleConfig, ConfigError> {
    let api_url = resolve_api_url(overrides.api_url.as_deref(), profile)?;
    let mut config = ConsoleConfig::new(api_url);
    config.ws_url = resolve_ws_url(overrides.ws_url.as_deref(), profile)?;

    config.tls = match profile {
        Some(p) if p.insecure.unwrap_or(false) => TlsVerification::DangerAcceptInvalid,
        Some(Profile {
            ca_cert: Some(path),
            ..
        }) => TlsVerification::CustomCa(path.clone()),
        _ => TlsVerification::SystemDefaults,
    };

    let timeout = overrides
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(defaults.timeout);
    config.timeout = Duration::from_secs(timeout);
    config.device_poll_interval = Duration::from_secs(defaults.device_poll_interval);

    config.property = overrides
        .property
        .as_deref()
        .or_else(|| profile.and_then(|p| p.default_property.as_deref()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EntityId::from);

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pick_prefers_the_first_non_empty_source() {
        assert_eq!(pick(&[None, Some("  "), Some("b")], Some("z")), Some("b"));
        assert_eq!(pick(&[None, None], Some("z")), Some("z"));
        assert_eq!(pick(&[None], None), None);
    }

    #[test]
    fn flag_beats_profile_for_api_url() {
        let profile = Profile {
            api_url: Some("https://staging.innkeep.app".into()),
            ..Profile::default()
        };
        let url = resolve_api_url(Some("https://flag.example"), Some(&profile)).unwrap();
        assert_eq!(url.as_str(), "https://flag.example/");
    }

    #[test]
    fn environment_fallbacks() {
        assert_eq!(
            Environment::Development.api_fallback(),
            "http://localhost:3001"
        );
        assert_eq!(Environment::Production.ws_fallback(), "wss://api.innkeep.app");
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
    }

    #[test]
    fn invalid_profile_url_is_a_validation_error() {
        let profile = Profile {
            api_url: Some("not a url".into()),
            ..Profile::default()
        };
        let err = resolve_api_url(Some("::"), Some(&profile)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn console_config_layers_overrides() {
        let profile = Profile {
            api_url: Some("https://staging.innkeep.app".into()),
            default_property: Some("7".into()),
            timeout: Some(10),
            insecure: Some(true),
            ..Profile::default()
        };
        let overrides = Overrides {
            api_url: Some("https://flag.example".into()),
            timeout: Some(5),
            ..Overrides::default()
        };
        let cfg = build_console_config(&Defaults::default(), Some(&profile), &overrides).unwrap();
        assert_eq!(cfg.api_url.as_str(), "https://flag.example/");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.property, Some(EntityId::from(7)));
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.device_poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                environment: Environment::Development,
                email: Some("ops@example.com".into()),
                ..Profile::default()
            },
        );
        cfg.default_profile = Some("staging".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile_name(None), "staging");
        let profile = loaded.profile("staging").unwrap();
        assert_eq!(profile.environment, Environment::Development);
        assert_eq!(profile.email.as_deref(), Some("ops@example.com"));
        assert_eq!(loaded.defaults.output, "table");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.profile_name(Some("x")), "x");
        assert_eq!(cfg.defaults.device_poll_interval, 30);
    }
}
