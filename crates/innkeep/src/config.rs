//! CLI configuration -- thin wrapper around `innkeep_config` shared types.
//!
//! Adds the resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --property, ...) and picks the session store.

use std::sync::Arc;

use secrecy::SecretString;

use innkeep_core::{
    ConsoleConfig, MemorySessionStore, Session, SessionStore, TlsVerification,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use innkeep_config::{
    Config, Defaults, Environment, KeyringSessionStore, Overrides, Profile, config_path,
    load_config_or_default, save_config, session_path,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Everything a console-bound command needs.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Option<Profile>,
    pub console: ConsoleConfig,
}

/// Translate config + global flags into a `ConsoleConfig`.
///
/// An explicitly named profile must exist; the implicit default may be
/// absent, in which case flags, env and built-in endpoints apply.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profile(&profile_name).cloned();

    if profile.is_none() && global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    let overrides = Overrides {
        api_url: global.api_url.clone(),
        ws_url: global.ws_url.clone(),
        property: global.property.clone(),
        timeout: global.timeout,
    };
    let mut console =
        innkeep_config::build_console_config(&cfg.defaults, profile.as_ref(), &overrides)?;
    if global.insecure {
        console.tls = TlsVerification::DangerAcceptInvalid;
    }

    Ok(Resolved {
        profile_name,
        profile,
        console,
    })
}

/// A token from `--token`, the profile's env var or plaintext config
/// lives for this process only; otherwise the keyring session is used.
pub fn session_store(global: &GlobalOpts, resolved: &Resolved) -> Arc<dyn SessionStore> {
    let explicit = global
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| SecretString::from(t.to_owned()))
        .or_else(|| innkeep_config::resolve_token(resolved.profile.as_ref()));

    match explicit {
        Some(token) => Arc::new(MemorySessionStore::with_session(Session::new(token, None))),
        None => Arc::new(KeyringSessionStore::new(resolved.profile_name.clone())),
    }
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
